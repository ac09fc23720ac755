pub mod api;
pub mod endpoints;
