#![cfg_attr(not(test), deny(clippy::panic))]
//! Real-time multiplayer trivia game server.
//!
//! A host creates a session and is handed a 4-digit PIN; teams join the
//! lobby by PIN, the host drives the question/answer-reveal cycle, and
//! scoring rewards both correctness and speed. See `SPEC_FULL.md` for the
//! full behavioral contract.

pub mod config;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod session;
pub mod websocket;

pub use config::AppConfig;
pub use server::GameServer;
