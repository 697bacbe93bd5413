//! Validated dialogue run parameters.

use super::error::DialogueError;

/// Minimum accepted per-turn word limit.
pub const MIN_WORD_LIMIT: u32 = 50;
/// Maximum accepted per-turn word limit.
pub const MAX_WORD_LIMIT: u32 = 500;
/// Minimum accepted number of rounds.
pub const MIN_ROUNDS: u32 = 1;
/// Maximum accepted number of rounds.
pub const MAX_ROUNDS: u32 = 20;

/// Immutable configuration for one dialogue run.
///
/// Constructed only through [`DialogueConfig::new`], which enforces every
/// range and non-emptiness invariant, so holders of a value never need to
/// re-validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueConfig {
    role1: String,
    role2: String,
    topic: String,
    word_limit: u32,
    rounds: u32,
}

impl DialogueConfig {
    /// Creates a validated configuration.
    ///
    /// Role names and topic are trimmed; the word limit must be within
    /// 50..=500 and rounds within 1..=20.
    pub fn new(
        role1: impl Into<String>,
        role2: impl Into<String>,
        topic: impl Into<String>,
        word_limit: u32,
        rounds: u32,
    ) -> Result<Self, DialogueError> {
        let role1 = role1.into().trim().to_string();
        let role2 = role2.into().trim().to_string();
        let topic = topic.into().trim().to_string();

        if role1.is_empty() {
            return Err(DialogueError::MissingField { field: "role1" });
        }
        if role2.is_empty() {
            return Err(DialogueError::MissingField { field: "role2" });
        }
        if topic.is_empty() {
            return Err(DialogueError::MissingField { field: "topic" });
        }
        if !(MIN_WORD_LIMIT..=MAX_WORD_LIMIT).contains(&word_limit) {
            return Err(DialogueError::WordLimitOutOfRange { value: word_limit });
        }
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&rounds) {
            return Err(DialogueError::RoundsOutOfRange { value: rounds });
        }

        Ok(Self {
            role1,
            role2,
            topic,
            word_limit,
            rounds,
        })
    }

    /// First persona's name.
    pub fn role1(&self) -> &str {
        &self.role1
    }

    /// Second persona's name.
    pub fn role2(&self) -> &str {
        &self.role2
    }

    /// Topic for the opening turn.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Per-turn content length bound, in characters.
    pub fn word_limit(&self) -> u32 {
        self.word_limit
    }

    /// Number of round-pairs to generate.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}
