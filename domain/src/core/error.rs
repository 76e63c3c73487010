//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("At least two participants are required, got {0}")]
    NotEnoughParticipants(usize),

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid engine parameter: {0}")]
    InvalidParameter(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        assert_eq!(DomainError::Cancelled.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::NotEnoughParticipants(1).is_cancelled());
        assert!(!DomainError::InvalidTopic("x".to_string()).is_cancelled());
    }
}
