//! Conversation events - the engine's only output.
//!
//! Wire shapes are consumed directly by SSE clients, so the serialized form
//! is part of the contract: a lowercase `type` tag plus camelCase fields
//! (`isRole1`, `totalRounds`).

use serde::{Deserialize, Serialize};

/// An event produced while driving a dialogue run.
///
/// A successful run of N rounds emits `Loading`/`Message` pairs in the fixed
/// interleaving `(role1, r), (role2, r)` for r = 1..N, then one `Complete`.
/// Any failure truncates the sequence with exactly one `Error`. Nothing
/// follows a terminal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DialogueEvent {
    /// A provider call for `role` is about to begin.
    Loading {
        /// Persona whose turn is being generated.
        role: String,
        /// 1-based round index.
        round: u32,
    },

    /// A turn was produced and sanitized.
    #[serde(rename_all = "camelCase")]
    Message {
        /// Persona that produced the turn.
        role: String,
        /// Sanitized content.
        content: String,
        /// 1-based round index.
        round: u32,
        /// True when the turn belongs to the first persona.
        is_role1: bool,
    },

    /// Terminal success event.
    #[serde(rename_all = "camelCase")]
    Complete {
        /// Number of rounds the run produced.
        total_rounds: u32,
    },

    /// Terminal failure event carrying a caller-safe description.
    Error {
        /// Caller-safe message; internal detail stays in the logs.
        message: String,
    },
}

impl DialogueEvent {
    /// Returns true for events that end the sequence.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DialogueEvent::Complete { .. } | DialogueEvent::Error { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_loading() {
        let event = DialogueEvent::Loading {
            role: "Socrates".to_string(),
            round: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "loading", "role": "Socrates", "round": 1})
        );
    }

    #[test]
    fn serializes_message_with_camel_case_flag() {
        let event = DialogueEvent::Message {
            role: "Socrates".to_string(),
            content: "Know thyself.".to_string(),
            round: 2,
            is_role1: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "message",
                "role": "Socrates",
                "content": "Know thyself.",
                "round": 2,
                "isRole1": true
            })
        );
    }

    #[test]
    fn serializes_complete_with_camel_case_total() {
        let event = DialogueEvent::Complete { total_rounds: 3 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "complete", "totalRounds": 3})
        );
    }

    #[test]
    fn serializes_error() {
        let event = DialogueEvent::Error {
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"type": "error", "message": "boom"}));
    }

    #[test]
    fn round_trips_through_json() {
        let event = DialogueEvent::Message {
            role: "a cat".to_string(),
            content: "meow".to_string(),
            round: 1,
            is_role1: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: DialogueEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn terminal_classification() {
        assert!(DialogueEvent::Complete { total_rounds: 1 }.is_terminal());
        assert!(DialogueEvent::Error {
            message: String::new()
        }
        .is_terminal());
        assert!(!DialogueEvent::Loading {
            role: String::new(),
            round: 1
        }
        .is_terminal());
        assert!(!DialogueEvent::Message {
            role: String::new(),
            content: String::new(),
            round: 1,
            is_role1: true
        }
        .is_terminal());
    }
}
