//! Type definitions for the RunDebate use case.

use crate::config::EngineParams;
use crate::ports::turn_generator::GenerationError;
use dialectic_domain::{DebateEngineOutput, DomainError, PersonaId, Topic};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that end a debate run
///
/// Run-ending variants carry whatever the run produced up to that point.
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("Generation failed at turn {turn_index}: {error}")]
    GenerationFailure {
        turn_index: usize,
        #[source]
        error: GenerationError,
        partial: Box<DebateEngineOutput>,
    },

    #[error("Cancelled before turn {turn_index}")]
    Cancelled {
        turn_index: usize,
        partial: Box<DebateEngineOutput>,
    },
}

impl RunDebateError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunDebateError::Cancelled { .. })
    }

    /// Transcript and graph accumulated before the run ended
    pub fn partial_output(&self) -> Option<&DebateEngineOutput> {
        match self {
            RunDebateError::InvalidInput(_) => None,
            RunDebateError::GenerationFailure { partial, .. }
            | RunDebateError::Cancelled { partial, .. } => Some(partial),
        }
    }

    pub fn into_partial_output(self) -> Option<DebateEngineOutput> {
        match self {
            RunDebateError::InvalidInput(_) => None,
            RunDebateError::GenerationFailure { partial, .. }
            | RunDebateError::Cancelled { partial, .. } => Some(*partial),
        }
    }
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub topic: Topic,
    /// Participants, in speaking order for the opening phase
    pub personas: Vec<PersonaId>,
    pub params: EngineParams,
}

impl RunDebateInput {
    pub fn new(topic: impl Into<Topic>, personas: Vec<PersonaId>) -> Self {
        Self {
            topic: topic.into(),
            personas,
            params: EngineParams::default(),
        }
    }

    pub fn with_params(mut self, params: EngineParams) -> Self {
        self.params = params;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.personas.len() < 2 {
            return Err(DomainError::NotEnoughParticipants(self.personas.len()));
        }
        let mut seen = BTreeSet::new();
        for persona in &self.personas {
            if !seen.insert(persona) {
                return Err(DomainError::DuplicateParticipant(persona.to_string()));
            }
        }
        self.params.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_two_personas() {
        let input = RunDebateInput::new("Cars in cities", vec!["x".into()]);
        assert_eq!(input.validate(), Err(DomainError::NotEnoughParticipants(1)));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let input = RunDebateInput::new("Cars in cities", vec!["x".into(), "x".into()]);
        assert_eq!(
            input.validate(),
            Err(DomainError::DuplicateParticipant("x".to_string()))
        );
    }

    #[test]
    fn test_validate_checks_params() {
        let input = RunDebateInput::new("Cars in cities", vec!["x".into(), "y".into()])
            .with_params(EngineParams::default().with_max_turns(0));
        assert!(matches!(input.validate(), Err(DomainError::InvalidParameter(_))));
    }

    #[test]
    fn test_invalid_input_has_no_partial_output() {
        let err = RunDebateError::from(DomainError::NotEnoughParticipants(0));
        assert!(err.partial_output().is_none());
        assert!(!err.is_cancelled());
    }
}
