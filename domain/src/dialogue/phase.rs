//! Debate phases and transition reasons

use serde::{Deserialize, Serialize};

/// Phase of a debate run. Ordered: a run only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebatePhase {
    /// Phase 1 - every participant states an opening position
    Opening,
    /// Phase 2 - claims and challenges
    Exchange,
    /// Phase 3 - search for the root disagreement
    CruxSeeking,
    /// Phase 4 - concessions and closing
    Resolution,
}

impl DebatePhase {
    pub fn number(&self) -> u8 {
        match self {
            DebatePhase::Opening => 1,
            DebatePhase::Exchange => 2,
            DebatePhase::CruxSeeking => 3,
            DebatePhase::Resolution => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DebatePhase::Opening => "opening",
            DebatePhase::Exchange => "exchange",
            DebatePhase::CruxSeeking => "crux_seeking",
            DebatePhase::Resolution => "resolution",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DebatePhase::Opening => "Opening",
            DebatePhase::Exchange => "Exchange",
            DebatePhase::CruxSeeking => "Crux Seeking",
            DebatePhase::Resolution => "Resolution",
        }
    }

    /// The phase after this one, `None` for the last phase
    pub fn next(&self) -> Option<DebatePhase> {
        match self {
            DebatePhase::Opening => Some(DebatePhase::Exchange),
            DebatePhase::Exchange => Some(DebatePhase::CruxSeeking),
            DebatePhase::CruxSeeking => Some(DebatePhase::Resolution),
            DebatePhase::Resolution => None,
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Phase {}: {}", self.number(), self.display_name())
    }
}

/// Why the controller changed phase or stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// Every participant produced an opening turn
    AllOpened,
    /// Contested frontier stopped growing
    FrontierStalled,
    /// Only REFRAME / CLARIFY moves over the circling window
    Circling,
    /// A crux was proposed and acknowledged by another persona
    CruxAcknowledged,
    /// The crux-seeking turn budget ran out
    CruxBudgetExhausted,
    /// Convergence detected in the resolution phase
    Converged,
    /// The global turn budget ran out
    TurnBudgetExhausted,
}

impl TransitionReason {
    pub fn description(&self) -> &'static str {
        match self {
            TransitionReason::AllOpened => "all participants opened",
            TransitionReason::FrontierStalled => "contested frontier stopped growing",
            TransitionReason::Circling => "speakers are circling",
            TransitionReason::CruxAcknowledged => "crux acknowledged",
            TransitionReason::CruxBudgetExhausted => "crux-seeking budget exhausted",
            TransitionReason::Converged => "debate converged",
            TransitionReason::TurnBudgetExhausted => "turn budget exhausted",
        }
    }
}

/// A phase change decided by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub reason: TransitionReason,
    /// Set when circling pushed the debate forward
    pub forced: bool,
}
