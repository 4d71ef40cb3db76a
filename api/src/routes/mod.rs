pub mod ask;
pub mod assess;
pub mod explain;
pub mod health_route;
pub mod index;
pub mod search;
