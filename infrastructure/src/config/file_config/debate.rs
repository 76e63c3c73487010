//! Debate configuration from TOML (`[debate]` section)

use super::ConfigValidationError;
use dialectic_application::EngineParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw engine thresholds from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub max_turns: usize,
    /// Exchange turns with a non-increasing frontier before crux seeking
    pub stall_turns: usize,
    pub crux_turn_budget: usize,
    pub convergence_window: usize,
    pub circling_window: usize,
    /// Consecutive CLARIFY turns batched into one crystallization
    pub crystallize_window: usize,
    /// Per-call limit for the turn and crystallization capabilities
    pub timeout_seconds: Option<u64>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            max_turns: params.max_turns,
            stall_turns: params.policy.stall_turns,
            crux_turn_budget: params.policy.crux_turn_budget,
            convergence_window: params.policy.convergence_window,
            circling_window: params.policy.circling_window,
            crystallize_window: params.policy.crystallize_window,
            timeout_seconds: None,
        }
    }
}

impl FileDebateConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let fields = [
            ("max_turns", self.max_turns),
            ("stall_turns", self.stall_turns),
            ("crux_turn_budget", self.crux_turn_budget),
            ("convergence_window", self.convergence_window),
            ("circling_window", self.circling_window),
            ("crystallize_window", self.crystallize_window),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigValidationError::ZeroValue(name));
        }
        if self.timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Ok(())
    }

    /// Convert to application-layer parameters
    pub fn to_engine_params(&self) -> EngineParams {
        EngineParams::default()
            .with_max_turns(self.max_turns)
            .with_stall_turns(self.stall_turns)
            .with_crux_turn_budget(self.crux_turn_budget)
            .with_convergence_window(self.convergence_window)
            .with_circling_window(self.circling_window)
            .with_crystallize_window(self.crystallize_window)
            .with_capability_timeout(self.timeout_seconds.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_params() {
        assert_eq!(
            FileDebateConfig::default().to_engine_params(),
            EngineParams::default()
        );
    }

    #[test]
    fn test_to_engine_params() {
        let config = FileDebateConfig {
            max_turns: 8,
            circling_window: 3,
            timeout_seconds: Some(20),
            ..Default::default()
        };
        let params = config.to_engine_params();
        assert_eq!(params.max_turns, 8);
        assert_eq!(params.policy.circling_window, 3);
        assert_eq!(params.capability_timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = FileDebateConfig {
            timeout_seconds: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));
    }
}
