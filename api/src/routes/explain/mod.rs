pub mod explain_request;
pub mod explain_route;
