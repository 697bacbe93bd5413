//! Dialogue domain errors.

use thiserror::Error;

/// Errors surfaced before any dialogue work begins.
///
/// Every variant maps to a caller-facing rejection; once a run has started,
/// failures are reported through the event stream instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    /// A required text field was missing or blank.
    #[error("Please provide both role names and a topic")]
    MissingField {
        /// Name of the offending parameter.
        field: &'static str,
    },

    /// The per-turn word limit was outside the accepted range.
    #[error("Word limit must be between 50 and 500 characters")]
    WordLimitOutOfRange {
        /// The rejected value.
        value: u32,
    },

    /// The round count was outside the accepted range.
    #[error("Rounds must be between 1 and 20")]
    RoundsOutOfRange {
        /// The rejected value.
        value: u32,
    },
}
