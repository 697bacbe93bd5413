//! Request and response DTOs for the HTTP boundary.

use serde::{Deserialize, Serialize};

use crate::domain::dialogue::{DialogueConfig, DialogueError};

/// Query parameters for `GET /api/start-conversation`.
///
/// All parameters are required on the wire; absent values are mapped to
/// sentinels that fail the same domain validation as out-of-range input, so
/// every rejection carries a caller-facing reason.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationParams {
    /// First persona's name.
    #[serde(default)]
    pub role1: Option<String>,
    /// Second persona's name.
    #[serde(default)]
    pub role2: Option<String>,
    /// Topic for the opening turn.
    #[serde(default)]
    pub topic: Option<String>,
    /// Per-turn content bound, 50..=500.
    #[serde(default)]
    pub word_limit: Option<u32>,
    /// Number of round-pairs, 1..=20.
    #[serde(default)]
    pub rounds: Option<u32>,
}

impl StartConversationParams {
    /// Validates the parameters into an immutable dialogue configuration.
    pub fn into_config(self) -> Result<DialogueConfig, DialogueError> {
        DialogueConfig::new(
            self.role1.unwrap_or_default(),
            self.role2.unwrap_or_default(),
            self.topic.unwrap_or_default(),
            self.word_limit.unwrap_or(0),
            self.rounds.unwrap_or(0),
        )
    }
}

/// JSON error payload, used for every non-streaming rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Caller-facing description.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Payload for `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server responds.
    pub status: &'static str,
    /// ISO-8601 timestamp of the check.
    pub timestamp: String,
    /// Configured environment name.
    pub environment: &'static str,
}

/// Payload for the `/` landing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LandingResponse {
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Where to start a conversation stream.
    pub stream_endpoint: &'static str,
}
