//! A single persona contribution within a dialogue run.

/// One sanitized persona turn, appended to the run's history.
///
/// History entries are never mutated or removed; insertion order is emission
/// order is temporal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Persona that produced this turn.
    pub role: String,
    /// Sanitized content, at most `word_limit` characters.
    pub content: String,
    /// 1-based round index.
    pub round: u32,
}

impl Turn {
    /// Creates a new turn.
    pub fn new(role: impl Into<String>, content: impl Into<String>, round: u32) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            round,
        }
    }
}
