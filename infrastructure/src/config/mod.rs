//! Configuration file loading for dialectic
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DIALECTIC_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./dialectic.toml` or `./.dialectic.toml`
//! 4. Global: `$XDG_CONFIG_HOME/dialectic/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDebateConfig, FileLogConfig, FileOutputConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
