//! Engine parameters for the debate loop
//!
//! [`EngineParams`] groups the static parameters that control the turn loop
//! in [`RunDebateUseCase`](crate::use_cases::run_debate::RunDebateUseCase):
//! the global turn budget, capability timeouts and the phase thresholds of
//! the domain [`DebatePolicy`].

use dialectic_domain::{DebatePolicy, DomainError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Hard cap on dialogue turns in one run.
    pub max_turns: usize,
    /// Phase thresholds and windows.
    pub policy: DebatePolicy,
    /// Per-call limit for the turn and crystallization capabilities.
    pub capability_timeout: Option<Duration>,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            max_turns: 30,
            policy: DebatePolicy::default(),
            capability_timeout: None,
        }
    }
}

impl EngineParams {
    // ==================== Builder Methods ====================

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_stall_turns(mut self, turns: usize) -> Self {
        self.policy.stall_turns = turns;
        self
    }

    pub fn with_crux_turn_budget(mut self, turns: usize) -> Self {
        self.policy.crux_turn_budget = turns;
        self
    }

    pub fn with_convergence_window(mut self, window: usize) -> Self {
        self.policy.convergence_window = window;
        self
    }

    pub fn with_circling_window(mut self, window: usize) -> Self {
        self.policy.circling_window = window;
        self
    }

    pub fn with_crystallize_window(mut self, window: usize) -> Self {
        self.policy.crystallize_window = window;
        self
    }

    pub fn with_capability_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.capability_timeout = timeout;
        self
    }

    /// Reject zero budgets and windows.
    pub fn validate(&self) -> Result<(), DomainError> {
        let checks = [
            ("max_turns", self.max_turns),
            ("stall_turns", self.policy.stall_turns),
            ("crux_turn_budget", self.policy.crux_turn_budget),
            ("convergence_window", self.policy.convergence_window),
            ("circling_window", self.policy.circling_window),
            ("crystallize_window", self.policy.crystallize_window),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(DomainError::InvalidParameter(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        Ok(())
    }
}
