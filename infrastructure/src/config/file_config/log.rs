//! Log configuration from TOML (`[log]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// JSONL engine event log written during every run
    pub events: Option<String>,
    /// Diagnostics log file (tracing output)
    pub file: Option<String>,
}
