//! Rate limiting middleware for axum.
//!
//! Enforces the general per-IP API window using the `RateLimiter` port; the
//! stricter conversation-start window is checked inside the conversation
//! handler before an engine is constructed.
//!
//! Rate limit status is returned in standard HTTP headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the window resets
//! - `Retry-After`: Seconds to wait (only on 429 responses)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::dto::ErrorBody;
use crate::ports::{RateLimitKey, RateLimitResult, RateLimiter};

/// Rate limiter middleware state.
pub type RateLimiterState = Arc<dyn RateLimiter>;

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    /// Maximum requests allowed in the window.
    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    /// Requests remaining in the current window.
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    /// Unix timestamp when the window resets.
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Per-IP rate limiting middleware for the general API window.
///
/// Requests without a resolvable client IP are let through unchecked, and a
/// failing limiter backend fails open - availability over strictness.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiterState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(request.headers(), connect_info.as_ref());

    if let Some(ip) = &ip {
        match limiter.check(RateLimitKey::ip(ip)).await {
            Ok(RateLimitResult::Denied(denied)) => {
                return rate_limit_response(denied.limit, 0, denied.retry_after_secs);
            }
            Err(e) => {
                tracing::warn!("Rate limiter unavailable: {}", e);
            }
            Ok(RateLimitResult::Allowed(_)) => {}
        }
    }

    let mut response = next.run(request).await;

    if let Some(ip) = &ip {
        // Report status without consuming another slot
        if let Ok(status) = limiter.status(RateLimitKey::ip(ip)).await {
            add_rate_limit_headers(
                &mut response,
                status.limit,
                status.remaining,
                status.reset_at_unix,
            );
        }
    }

    response
}

/// Extract the client IP, checking forwarded headers first.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
pub fn client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> Option<String> {
    if let Some(forwarded) = headers.get("X-Forwarded-For").and_then(|h| h.to_str().ok()) {
        if let Some(first_ip) = forwarded.split(',').next() {
            return Some(first_ip.trim().to_string());
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP").and_then(|h| h.to_str().ok()) {
        return Some(real_ip.to_string());
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

/// Create a 429 Too Many Requests response.
pub fn rate_limit_response(limit: u32, remaining: u32, retry_after_secs: u32) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(ErrorBody::new("Too many requests, please try again later")),
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(
        headers::X_RATELIMIT_LIMIT.clone(),
        HeaderValue::from_str(&limit.to_string()).unwrap(),
    );
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from_str(&remaining.to_string()).unwrap(),
    );
    headers.insert(
        "Retry-After",
        HeaderValue::from_str(&retry_after_secs.to_string()).unwrap(),
    );

    response
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(response: &mut Response, limit: u32, remaining: u32, reset_at: u64) {
    let headers = response.headers_mut();
    headers.insert(
        headers::X_RATELIMIT_LIMIT.clone(),
        HeaderValue::from_str(&limit.to_string()).unwrap(),
    );
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from_str(&remaining.to_string()).unwrap(),
    );
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from_str(&reset_at.to_string()).unwrap(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── IP Extraction Tests ─────────────────────────────────────────

    fn header_map(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, value.parse().unwrap());
        }
        headers
    }

    #[test]
    fn extract_ip_from_x_forwarded_for() {
        let headers = header_map(&[("X-Forwarded-For", "1.2.3.4, 5.6.7.8")]);
        assert_eq!(client_ip(&headers, None), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_ip_from_x_real_ip() {
        let headers = header_map(&[("X-Real-IP", "9.8.7.6")]);
        assert_eq!(client_ip(&headers, None), Some("9.8.7.6".to_string()));
    }

    #[test]
    fn extract_ip_prefers_x_forwarded_for() {
        let headers = header_map(&[("X-Forwarded-For", "1.2.3.4"), ("X-Real-IP", "5.6.7.8")]);
        assert_eq!(client_ip(&headers, None), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_ip_falls_back_to_connect_info() {
        let headers = HeaderMap::new();
        let connect_info = ConnectInfo("10.1.2.3:4567".parse::<SocketAddr>().unwrap());
        assert_eq!(
            client_ip(&headers, Some(&connect_info)),
            Some("10.1.2.3".to_string())
        );
    }

    #[test]
    fn extract_ip_returns_none_without_sources() {
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }

    // ─── Response Tests ──────────────────────────────────────────────

    #[test]
    fn rate_limit_response_has_429_status() {
        let response = rate_limit_response(100, 0, 60);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn rate_limit_response_has_retry_after_header() {
        let response = rate_limit_response(100, 0, 30);
        let retry_after = response.headers().get("Retry-After").unwrap();
        assert_eq!(retry_after, "30");
    }

    #[test]
    fn rate_limit_response_has_limit_headers() {
        let response = rate_limit_response(100, 0, 60);
        assert!(response.headers().contains_key("x-ratelimit-limit"));
        assert!(response.headers().contains_key("x-ratelimit-remaining"));
    }

    // ─── Type Safety Tests ───────────────────────────────────────────

    #[test]
    fn rate_limiter_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RateLimiterState>();
    }
}
