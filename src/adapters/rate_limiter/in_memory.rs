//! In-memory rate limiter implementation.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap.
//! Suitable for single-server deployments; a multi-server setup would need a
//! shared-store implementation behind the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::{RateLimitConfig, WindowLimit};

/// In-memory fixed-window rate limiter.
///
/// Each key tracks a request count that resets when its window expires.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    /// Rate limit configuration.
    config: RateLimitConfig,
    /// Per-key window state.
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// When the current window started.
    window_start: u64,
    /// Window duration in seconds.
    window_secs: u32,
}

impl InMemoryRateLimiter {
    /// Create a new in-memory rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a rate limiter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Get the window limit for a key.
    ///
    /// Keys with a resource use the conversation window; plain IP keys use
    /// the general API window.
    fn limits_for(&self, key: &RateLimitKey) -> WindowLimit {
        if key.resource.is_some() {
            self.config.conversations
        } else {
            self.config.api
        }
    }

    /// Get current timestamp as unix seconds.
    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let cache_key = key.cache_key();
        let limits = self.limits_for(&key);
        let now = Self::now_secs();

        let mut windows = self.windows.write().await;

        let state = windows.entry(cache_key).or_insert_with(|| WindowState {
            count: 0,
            window_start: now,
            window_secs: limits.window_secs,
        });

        // Expired window starts over
        let window_end = state.window_start + state.window_secs as u64;
        if now >= window_end {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= limits.max_requests {
            let retry_after = (state.window_start + state.window_secs as u64)
                .saturating_sub(now) as u32;

            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit: limits.max_requests,
                retry_after_secs: retry_after.max(1),
                message: "Too many requests, please try again later".to_string(),
            }));
        }

        state.count += 1;
        let remaining = limits.max_requests.saturating_sub(state.count);
        let reset_at_unix = state.window_start + state.window_secs as u64;

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit: limits.max_requests,
            remaining,
            reset_at_unix,
            window_secs: limits.window_secs,
        }))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let cache_key = key.cache_key();
        let limits = self.limits_for(&key);
        let now = Self::now_secs();

        let windows = self.windows.read().await;

        let (count, window_start) = windows
            .get(&cache_key)
            .map(|state| {
                let window_end = state.window_start + state.window_secs as u64;
                if now >= window_end {
                    (0, now) // Window expired
                } else {
                    (state.count, state.window_start)
                }
            })
            .unwrap_or((0, now));

        let remaining = limits.max_requests.saturating_sub(count);
        let reset_at_unix = window_start + limits.window_secs as u64;

        Ok(RateLimitStatus {
            limit: limits.max_requests,
            remaining,
            reset_at_unix,
            window_secs: limits.window_secs,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let cache_key = key.cache_key();
        let mut windows = self.windows.write().await;
        windows.remove(&cache_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::CONVERSATION_RESOURCE;

    fn low_limit_config(api_max: u32, conversation_max: u32) -> RateLimitConfig {
        RateLimitConfig {
            api: WindowLimit {
                max_requests: api_max,
                window_secs: 60,
            },
            conversations: WindowLimit {
                max_requests: conversation_max,
                window_secs: 60,
            },
        }
    }

    // ─── Basic Functionality Tests ───────────────────────────────────

    #[tokio::test]
    async fn allows_requests_within_limit() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let key = RateLimitKey::ip("192.168.1.1");

        for i in 0..10 {
            let result = limiter.check(key.clone()).await.unwrap();
            assert!(result.is_allowed(), "Request {} should be allowed", i + 1);
        }
    }

    #[tokio::test]
    async fn denies_requests_at_limit() {
        let limiter = InMemoryRateLimiter::new(low_limit_config(5, 3));
        let key = RateLimitKey::ip("192.168.1.1");

        for _ in 0..5 {
            let result = limiter.check(key.clone()).await.unwrap();
            assert!(result.is_allowed());
        }

        let result = limiter.check(key.clone()).await.unwrap();
        assert!(result.is_denied());

        if let RateLimitResult::Denied(denied) = result {
            assert_eq!(denied.limit, 5);
            assert!(denied.retry_after_secs > 0);
        }
    }

    #[tokio::test]
    async fn conversation_resource_uses_stricter_window() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let key = RateLimitKey::ip_resource("10.0.0.1", CONVERSATION_RESOURCE);

        for _ in 0..3 {
            let result = limiter.check(key.clone()).await.unwrap();
            assert!(result.is_allowed());
        }

        let result = limiter.check(key.clone()).await.unwrap();
        assert!(result.is_denied());
    }

    #[tokio::test]
    async fn conversation_and_api_windows_are_independent() {
        let limiter = InMemoryRateLimiter::new(low_limit_config(100, 1));
        let ip = "10.0.0.2";

        // Exhaust the conversation window
        let conversation_key = RateLimitKey::ip_resource(ip, CONVERSATION_RESOURCE);
        assert!(limiter
            .check(conversation_key.clone())
            .await
            .unwrap()
            .is_allowed());
        assert!(limiter.check(conversation_key).await.unwrap().is_denied());

        // The plain API window for the same IP is untouched
        let api_key = RateLimitKey::ip(ip);
        assert!(limiter.check(api_key).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn status_returns_remaining_count_without_consuming() {
        let limiter = InMemoryRateLimiter::new(low_limit_config(10, 3));
        let key = RateLimitKey::ip("10.0.0.3");

        let status = limiter.status(key.clone()).await.unwrap();
        assert_eq!(status.limit, 10);
        assert_eq!(status.remaining, 10);

        for _ in 0..3 {
            limiter.check(key.clone()).await.unwrap();
        }

        let status = limiter.status(key.clone()).await.unwrap();
        assert_eq!(status.remaining, 7);

        // A second status call reports the same value
        let status = limiter.status(key).await.unwrap();
        assert_eq!(status.remaining, 7);
    }

    #[tokio::test]
    async fn reset_clears_counter() {
        let limiter = InMemoryRateLimiter::new(low_limit_config(5, 3));
        let key = RateLimitKey::ip("10.0.0.4");

        for _ in 0..5 {
            limiter.check(key.clone()).await.unwrap();
        }
        assert!(limiter.check(key.clone()).await.unwrap().is_denied());

        limiter.reset(key.clone()).await.unwrap();

        assert!(limiter.check(key).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn different_ips_have_independent_limits() {
        let limiter = InMemoryRateLimiter::new(low_limit_config(3, 3));

        let key1 = RateLimitKey::ip("1.1.1.1");
        let key2 = RateLimitKey::ip("2.2.2.2");

        for _ in 0..3 {
            limiter.check(key1.clone()).await.unwrap();
        }
        assert!(limiter.check(key1).await.unwrap().is_denied());

        assert!(limiter.check(key2).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn remaining_decrements_correctly() {
        let limiter = InMemoryRateLimiter::new(low_limit_config(10, 3));
        let key = RateLimitKey::ip("10.0.0.5");

        for expected_remaining in (0..10u32).rev() {
            let result = limiter.check(key.clone()).await.unwrap();
            if let RateLimitResult::Allowed(status) = result {
                assert_eq!(status.remaining, expected_remaining);
            } else {
                panic!("request should be allowed");
            }
        }
    }
}
