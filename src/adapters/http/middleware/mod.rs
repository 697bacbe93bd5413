//! HTTP middleware.

pub mod rate_limit;
pub mod security;

pub use rate_limit::{client_ip, rate_limit_middleware, rate_limit_response, RateLimiterState};
pub use security::security_headers;
