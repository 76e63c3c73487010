//! Application-level configuration.
//!
//! - [`EngineParams`]: debate loop control (turn budget, timeouts, phase thresholds)

pub mod engine_params;

pub use engine_params::EngineParams;
