//! Domain layer for dialectic
//!
//! This crate contains the core debate logic: the argumentation graph, its
//! acceptance semantics and the dialogue state machine. It has no
//! dependencies on infrastructure or presentation concerns and performs no
//! I/O.
//!
//! # Core Concepts
//!
//! ## Argumentation graph
//!
//! Dialogue turns are crystallized into [`Argument`]s and [`Attack`]s held
//! in an [`ArgumentGraph`]. Crystallization diffs are validated before they
//! touch the graph, and the graph drops any edge that would dangle.
//!
//! ## Semantics
//!
//! - **Grounded labelling**: IN / OUT / UNDEC, the skeptical baseline
//! - **Preferred extensions**: maximal admissible positions, grouped into
//!   camps by speaker
//!
//! ## Dialogue
//!
//! Four phases (Opening, Exchange, Crux Seeking, Resolution). Every state
//! change is an [`EngineEvent`]; folding the events with
//! [`DebateLedger::replay`] rebuilds a run.

pub mod argument;
pub mod concession;
pub mod config;
pub mod convergence;
pub mod core;
pub mod dialogue;
pub mod event;
pub mod regime;
pub mod semantics;

// Re-export commonly used types
pub use argument::{
    ApplyReport, Argument, ArgumentGraph, ArgumentId, ArgumentPatch, Attack, AttackId,
    CrystallizationResult, GraphError, GraphSnapshot, MalformedCrystallization, NewArgument,
    NewAttack, parse_crystallization,
};
pub use concession::{Concession, ConcessionType, detect_concession};
pub use config::OutputFormat;
pub use convergence::{ConvergenceCheck, check_convergence};
pub use core::{error::DomainError, persona::PersonaId, topic::Topic};
pub use dialogue::{
    ControllerState, Crux, CruxProposal, DebateEngineOutput, DebatePhase, DebatePolicy,
    DialogueTurn, GraphSummary, Move, PhaseTransition, TokenUsage, TransitionReason, TurnMarkers,
};
pub use event::{DebateLedger, EngineDiagnostics, EngineErrorKind, EngineEvent, RunStatus};
pub use regime::Regime;
pub use semantics::{Camp, Extension, Label, SemanticsView};
