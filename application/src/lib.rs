//! Application layer for dialectic
//!
//! This crate contains the debate use case, the ports it drives (turn
//! generation, crystallization, event observation) and engine parameters.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::EngineParams;
pub use ports::{
    crystallizer::{CrystallizationCapability, CrystallizationPayload, CrystallizationRequest},
    event_sink::{CompositeSink, EngineEventSink, NoEvents, RecordingSink},
    turn_generator::{GeneratedTurn, GenerationError, TurnGenerator, TurnRequest},
};
pub use use_cases::run_debate::{RunDebateError, RunDebateInput, RunDebateUseCase};
