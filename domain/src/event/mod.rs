//! Engine event stream
//!
//! Every state change of a debate run is expressed as an [`EngineEvent`].
//! The engine applies each event to its own [`DebateLedger`] before handing
//! it to observers, so folding the recorded stream with
//! [`DebateLedger::replay`] rebuilds the same controller state, graph,
//! transcript and crux.

pub mod ledger;

pub use ledger::{DebateLedger, EngineDiagnostics, RunStatus};

use crate::argument::diff::CrystallizationResult;
use crate::argument::entities::ArgumentId;
use crate::concession::Concession;
use crate::convergence::ConvergenceCheck;
use crate::core::persona::PersonaId;
use crate::dialogue::controller::DebatePolicy;
use crate::dialogue::crux::Crux;
use crate::dialogue::phase::{DebatePhase, PhaseTransition, TransitionReason};
use crate::dialogue::turn::{DialogueTurn, TokenUsage};
use crate::regime::Regime;
use crate::semantics::{Camp, Label};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    EngineStart {
        topic: String,
        persona_ids: Vec<PersonaId>,
        max_turns: usize,
        policy: DebatePolicy,
    },
    PhaseStart {
        phase: DebatePhase,
        turn_index: usize,
    },
    PhaseTransition {
        turn_index: usize,
        transition: PhaseTransition,
    },
    DialogueTurn {
        turn: DialogueTurn,
        #[serde(default)]
        token_usage: TokenUsage,
    },
    Steering {
        turn_index: usize,
        persona_id: PersonaId,
        hint: String,
    },
    Crystallization {
        turn_index: usize,
        persona_id: PersonaId,
        /// Turns this crystallization covers (batched CLARIFY turns included)
        covered_turns: Vec<usize>,
        /// The diff as applied; empty when the payload was malformed
        diff: CrystallizationResult,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        malformed: Option<String>,
        #[serde(default)]
        token_usage: TokenUsage,
    },
    GraphUpdated {
        turn_index: usize,
        labels: BTreeMap<ArgumentId, Label>,
        grounded: Vec<ArgumentId>,
        camps: Vec<Camp>,
        contested_frontier: usize,
        invariant_violations: usize,
    },
    Concession {
        concession: Concession,
    },
    CruxProposed {
        turn_index: usize,
        crux: Crux,
    },
    ConvergenceCheck {
        turn_index: usize,
        check: ConvergenceCheck,
        circling: bool,
    },
    EngineComplete {
        turn_index: usize,
        reason: TransitionReason,
        regime: Regime,
        regime_description: String,
    },
    EngineError {
        turn_index: usize,
        kind: EngineErrorKind,
        message: String,
    },
}

/// Failure classes that end a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorKind {
    GenerationFailure,
    Cancelled,
}

impl EngineEvent {
    /// The `type` tag this event serializes with
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::EngineStart { .. } => "engine_start",
            EngineEvent::PhaseStart { .. } => "phase_start",
            EngineEvent::PhaseTransition { .. } => "phase_transition",
            EngineEvent::DialogueTurn { .. } => "dialogue_turn",
            EngineEvent::Steering { .. } => "steering",
            EngineEvent::Crystallization { .. } => "crystallization",
            EngineEvent::GraphUpdated { .. } => "graph_updated",
            EngineEvent::Concession { .. } => "concession",
            EngineEvent::CruxProposed { .. } => "crux_proposed",
            EngineEvent::ConvergenceCheck { .. } => "convergence_check",
            EngineEvent::EngineComplete { .. } => "engine_complete",
            EngineEvent::EngineError { .. } => "engine_error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EngineEvent::EngineComplete { .. } | EngineEvent::EngineError { .. }
        )
    }
}
