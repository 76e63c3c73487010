//! Argumentation graph domain
//!
//! Arguments, attacks, the graph store that owns them during a run, and the
//! crystallization diffs that edit it turn by turn.

pub mod diff;
pub mod entities;
pub mod graph;

pub use diff::{
    CrystallizationResult, MalformedCrystallization, NewArgument, NewAttack, extract_json,
    parse_crystallization,
};
pub use entities::{Argument, ArgumentId, ArgumentPatch, Attack, AttackId, PatchEffect};
pub use graph::{ApplyReport, ArgumentGraph, GraphError, GraphSnapshot, UpdatedArgument};
