//! Rate limiting port for protecting the API and controlling provider costs.
//!
//! This port defines the interface for rate limiting operations.
//! Implementations can use in-memory storage for single-server deployments
//! or a shared store for multi-server setups.

use async_trait::async_trait;

/// Port for rate limiting operations.
///
/// Implementations should be thread-safe and support concurrent access.
/// The rate limiter uses a fixed-window counter algorithm for simplicity.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if request is allowed, consuming a slot if so.
    ///
    /// Returns `Allowed` with remaining quota or `Denied` with retry info.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;

    /// Get current rate limit status without consuming a slot.
    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError>;

    /// Reset rate limit for a key, restoring full quota.
    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError>;
}

/// Key identifying what to rate limit.
///
/// Limits are keyed by client IP, optionally narrowed to a named resource
/// (e.g., conversation starts) that carries its own stricter window.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    /// Client identifier (IP address, or "unknown" when none is available).
    pub identifier: String,
    /// Optional resource for finer-grained limits.
    pub resource: Option<String>,
}

impl RateLimitKey {
    /// Creates an IP-based rate limit key.
    pub fn ip(ip: &str) -> Self {
        Self {
            identifier: ip.to_string(),
            resource: None,
        }
    }

    /// Creates an IP-based rate limit key for a specific resource.
    pub fn ip_resource(ip: &str, resource: &str) -> Self {
        Self {
            identifier: ip.to_string(),
            resource: Some(resource.to_string()),
        }
    }

    /// Returns the storage key string for this rate limit key.
    pub fn cache_key(&self) -> String {
        match &self.resource {
            Some(resource) => format!("ratelimit:ip:{}:{}", self.identifier, resource),
            None => format!("ratelimit:ip:{}", self.identifier),
        }
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed; includes current status.
    Allowed(RateLimitStatus),
    /// Request is denied; includes denial details.
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    /// Returns true if the request was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    /// Returns true if the request was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// Unix timestamp (seconds) when the current window resets.
    pub reset_at_unix: u64,
    /// Window duration in seconds.
    pub window_secs: u32,
}

/// Details of a rate limit denial.
#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Seconds until the client should retry.
    pub retry_after_secs: u32,
    /// Human-readable message explaining the denial.
    pub message: String,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Rate limiter backend is unavailable.
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}
