//! AI Provider Port - Interface for text-generation provider integrations.
//!
//! This port abstracts the external text-generation service (Gemini in
//! production, mocks in tests), enabling the dialogue engine to produce turns
//! without coupling to a specific provider. The engine receives the provider
//! as an explicit dependency at construction, so concurrent runs and tests can
//! substitute fakes freely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for text-generation provider interactions.
///
/// Implementations connect to an external model API and translate between the
/// provider-specific request format and plain prompt/response text.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion for the given prompt.
    ///
    /// Returns the raw model output; callers are responsible for any
    /// post-processing. Fails with [`AIError`] on any transport, quota, or
    /// model error.
    async fn generate(&self, prompt: &str) -> Result<String, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Provider identification, used in startup logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini").
    pub name: String,
    /// Model identifier (e.g., "gemini-pro").
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Text-generation provider errors.
///
/// The dialogue engine treats all variants uniformly (stop the run, report
/// once); the distinctions exist for logging and for adapter-level mapping.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_info_holds_name_and_model() {
        let info = ProviderInfo::new("gemini", "gemini-pro");
        assert_eq!(info.name, "gemini");
        assert_eq!(info.model, "gemini-pro");
    }

    #[test]
    fn ai_error_constructors_work() {
        let rate_limited = AIError::rate_limited(30);
        assert!(matches!(
            rate_limited,
            AIError::RateLimited {
                retry_after_secs: 30
            }
        ));

        let unavailable = AIError::unavailable("down");
        assert!(matches!(unavailable, AIError::Unavailable { .. }));

        let network = AIError::network("connection refused");
        assert!(matches!(network, AIError::Network(_)));

        let parse = AIError::parse("no candidates");
        assert!(matches!(parse, AIError::Parse(_)));
    }

    #[test]
    fn ai_error_displays_correctly() {
        let err = AIError::rate_limited(30);
        assert_eq!(err.to_string(), "rate limited: retry after 30s");

        let err = AIError::unavailable("server error 503");
        assert_eq!(err.to_string(), "provider unavailable: server error 503");

        let err = AIError::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "request timed out after 30s");
    }
}
