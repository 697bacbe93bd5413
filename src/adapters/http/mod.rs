//! HTTP adapter - the inbound REST/SSE boundary.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::app_router;
