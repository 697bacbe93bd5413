//! Conversation engine - the turn-taking state machine.
//!
//! One engine instance owns one run: its validated configuration, its
//! append-only history, and the deterministic turn schedule
//! `(role1, 1), (role2, 1), ..., (role1, rounds), (role2, rounds)`. Events go
//! out on an ordered channel as they are produced; the provider is an
//! injected capability so concurrent runs and tests can substitute fakes.
//!
//! The engine is strictly sequential: it never has two provider calls in
//! flight, and the pacing delay between turns is awaited before the next
//! call begins. There is no shared mutable state across runs and therefore
//! no locking.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::ports::AIProvider;

use super::config::DialogueConfig;
use super::event::DialogueEvent;
use super::prompt::build_role_prompt;
use super::sanitize::sanitize_response;
use super::turn::Turn;

/// Pacing delay between consecutive turns.
pub const DEFAULT_TURN_DELAY: Duration = Duration::from_secs(1);

/// Caller-safe description for any provider failure.
const PROVIDER_ERROR_MESSAGE: &str = "AI response generation failed, please try again later";

/// Which persona slot a turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSlot {
    /// The first persona; opens every round.
    Role1,
    /// The second persona; closes every round.
    Role2,
}

/// Engine lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, not yet driven.
    Idle,
    /// Producing one persona's turn within one round.
    RunningTurn {
        /// Persona slot whose turn is in progress.
        slot: RoleSlot,
        /// 1-based round index.
        round: u32,
    },
    /// All turns produced; `Complete` emitted.
    Completed,
    /// A provider call failed; `Error` emitted.
    Failed,
    /// The consumer went away; run stopped without a terminal event.
    Cancelled,
}

/// Drives one scripted dialogue run.
pub struct DialogueEngine {
    config: DialogueConfig,
    provider: Arc<dyn AIProvider>,
    history: Vec<Turn>,
    state: EngineState,
    turn_delay: Duration,
}

impl DialogueEngine {
    /// Creates an idle engine from a validated configuration and an injected
    /// provider.
    pub fn new(config: DialogueConfig, provider: Arc<dyn AIProvider>) -> Self {
        Self {
            config,
            provider,
            history: Vec::new(),
            state: EngineState::Idle,
            turn_delay: DEFAULT_TURN_DELAY,
        }
    }

    /// Overrides the pacing delay between turns (zero disables pacing).
    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Turns produced so far, in emission order.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Runs the dialogue to completion, sending every event on `events`.
    ///
    /// Emits, per turn: `Loading`, then `Message` once the provider call
    /// succeeded and its output was sanitized. A provider failure emits one
    /// `Error` and stops; a full run emits one `Complete`. A dropped
    /// receiver cancels the run before the next provider call is issued,
    /// with no further events.
    pub async fn run(mut self, events: mpsc::Sender<DialogueEvent>) -> EngineState {
        let total_turns = self.config.rounds() * 2;

        for turn_index in 0..total_turns {
            let round = turn_index / 2 + 1;
            let slot = if turn_index % 2 == 0 {
                RoleSlot::Role1
            } else {
                RoleSlot::Role2
            };
            let role = match slot {
                RoleSlot::Role1 => self.config.role1(),
                RoleSlot::Role2 => self.config.role2(),
            }
            .to_string();
            self.state = EngineState::RunningTurn { slot, round };

            // Consumer gone: stop before spending another provider call.
            if events.is_closed() {
                debug!(round, "event consumer disconnected, cancelling run");
                self.state = EngineState::Cancelled;
                return self.state;
            }

            let loading = DialogueEvent::Loading {
                role: role.clone(),
                round,
            };
            if events.send(loading).await.is_err() {
                self.state = EngineState::Cancelled;
                return self.state;
            }

            let opening = turn_index == 0;
            let previous = self.history.last().map(|turn| turn.content.clone());
            let prompt = build_role_prompt(
                &role,
                self.config.topic(),
                self.config.word_limit(),
                opening,
                previous.as_deref(),
            );

            let raw = match self.provider.generate(&prompt).await {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(error = %err, role = %role, round, "provider call failed");
                    self.state = EngineState::Failed;
                    let error = DialogueEvent::Error {
                        message: PROVIDER_ERROR_MESSAGE.to_string(),
                    };
                    let _ = events.send(error).await;
                    return self.state;
                }
            };

            let content = sanitize_response(&raw, self.config.word_limit());
            self.history.push(Turn::new(&role, &content, round));

            let message = DialogueEvent::Message {
                role,
                content,
                round,
                is_role1: slot == RoleSlot::Role1,
            };
            if events.send(message).await.is_err() {
                self.state = EngineState::Cancelled;
                return self.state;
            }

            // Pacing between turns; nothing follows the last turn.
            if turn_index + 1 < total_turns && !self.turn_delay.is_zero() {
                tokio::time::sleep(self.turn_delay).await;
            }
        }

        self.state = EngineState::Completed;
        let complete = DialogueEvent::Complete {
            total_rounds: self.config.rounds(),
        };
        let _ = events.send(complete).await;
        self.state
    }
}
