//! Infrastructure layer for dialectic
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration file loading, the JSONL engine event
//! log and the scripted debate capability.

pub mod config;
pub mod logging;
pub mod scripted;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDebateConfig, FileLogConfig,
    FileOutputConfig,
};
pub use logging::{EventLogError, JsonlEventLog, read_events};
pub use scripted::{DebateScript, ScriptError, ScriptedDebate};
