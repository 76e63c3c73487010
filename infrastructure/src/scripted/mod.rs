//! Scripted debate capability
//!
//! Offline adapter for both generation ports, driven by a TOML or JSON
//! script. Used by the CLI for reproducible runs and in integration tests.

mod adapter;
mod script;

pub use adapter::ScriptedDebate;
pub use script::{DebateScript, ScriptError, ScriptedCrux, ScriptedTurn};
