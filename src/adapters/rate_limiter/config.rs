//! Rate limit window configuration.

/// Resource name for the stricter conversation-start window.
pub const CONVERSATION_RESOURCE: &str = "start_conversation";

/// Rate limit configuration.
///
/// Two independent fixed windows per client IP: a general API cap and a much
/// stricter cap on conversation starts, since each start fans out into many
/// provider calls.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// General API window, applied to every `/api` request.
    pub api: WindowLimit,
    /// Conversation-start window, applied before an engine is constructed.
    pub conversations: WindowLimit,
}

/// A single fixed-window limit.
#[derive(Debug, Clone, Copy)]
pub struct WindowLimit {
    /// Maximum requests allowed in the window.
    pub max_requests: u32,
    /// Window duration in seconds.
    pub window_secs: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            // 100 requests per 15 minutes
            api: WindowLimit {
                max_requests: 100,
                window_secs: 15 * 60,
            },
            // 3 conversation starts per 5 minutes
            conversations: WindowLimit {
                max_requests: 3,
                window_secs: 5 * 60,
            },
        }
    }
}
