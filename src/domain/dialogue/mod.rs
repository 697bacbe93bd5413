//! Dialogue module - scripted two-persona conversation orchestration.
//!
//! The [`DialogueEngine`] drives a deterministic sequence of persona turns,
//! calling the injected [`crate::ports::AIProvider`] once per turn and
//! emitting [`DialogueEvent`]s onto an ordered channel as they are produced.

mod config;
mod engine;
mod error;
mod event;
mod prompt;
mod sanitize;
mod turn;

pub use config::{
    DialogueConfig, MAX_ROUNDS, MAX_WORD_LIMIT, MIN_ROUNDS, MIN_WORD_LIMIT,
};
pub use engine::{DialogueEngine, EngineState, RoleSlot, DEFAULT_TURN_DELAY};
pub use error::DialogueError;
pub use event::DialogueEvent;
pub use prompt::build_role_prompt;
pub use sanitize::sanitize_response;
pub use turn::Turn;
