//! Duologue - Streaming Two-Persona AI Dialogue Server
//!
//! This crate drives scripted, turn-based dialogues between two named
//! personas, generated turn-by-turn by an external text-generation provider
//! and streamed to callers as Server-Sent Events.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
