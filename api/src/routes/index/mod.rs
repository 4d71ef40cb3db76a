pub mod rebuild_route;
