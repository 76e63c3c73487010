//! Dialogue controller
//!
//! Turns, phases, the crux, the per-run [`state::ControllerState`] and the
//! rules that drive the phase state machine.

pub mod controller;
pub mod crux;
pub mod output;
pub mod phase;
pub mod state;
pub mod summary;
pub mod turn;

pub use controller::{
    DebatePolicy, FrontierTrend, completion_reason, next_speaker, next_transition,
    should_crystallize, steering_hint,
};
pub use crux::{Crux, CruxProposal, crux_after_turn};
pub use output::DebateEngineOutput;
pub use phase::{DebatePhase, PhaseTransition, TransitionReason};
pub use state::ControllerState;
pub use summary::{ArgumentDigest, GraphSummary};
pub use turn::{DialogueTurn, Move, TokenUsage, TurnMarkers};
