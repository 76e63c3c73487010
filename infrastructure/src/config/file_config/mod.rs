//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod debate;
mod log;
mod output;

pub use debate::FileDebateConfig;
pub use log::FileLogConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("debate.{0} must be at least 1")]
    ZeroValue(&'static str),

    #[error("debate.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("log.events path cannot be empty")]
    EmptyEventsPath,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Engine thresholds and budgets
    pub debate: FileDebateConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Event log and diagnostics log settings
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.debate.validate()?;
        if self
            .log
            .events
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(ConfigValidationError::EmptyEventsPath);
        }
        Ok(())
    }
}
