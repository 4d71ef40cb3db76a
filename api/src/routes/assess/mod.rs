pub mod assess_request;
pub mod assess_route;
