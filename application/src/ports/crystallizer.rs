//! Crystallization port
//!
//! The external capability that reads dialogue and proposes a graph diff.
//! It returns the raw payload; validation happens in the domain
//! ([`parse_crystallization`](dialectic_domain::parse_crystallization)) so a
//! malformed answer degrades to an empty diff instead of failing the run.

use super::turn_generator::GenerationError;
use async_trait::async_trait;
use dialectic_domain::{DialogueTurn, GraphSnapshot, TokenUsage, Topic};
use serde_json::Value;

/// Input for one crystallization call.
#[derive(Debug, Clone, Copy)]
pub struct CrystallizationRequest<'a> {
    pub topic: &'a Topic,
    /// The turn that triggered the crystallization
    pub turn: &'a DialogueTurn,
    /// Earlier turns not yet crystallized (batched CLARIFY turns), oldest first
    pub pending_turns: &'a [DialogueTurn],
    pub snapshot: &'a GraphSnapshot,
}

/// Raw capability output
#[derive(Debug, Clone, PartialEq)]
pub struct CrystallizationPayload {
    pub payload: Value,
    pub token_usage: TokenUsage,
}

impl CrystallizationPayload {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            token_usage: TokenUsage::default(),
        }
    }

    pub fn with_token_usage(mut self, usage: TokenUsage) -> Self {
        self.token_usage = usage;
        self
    }
}

/// Port for extracting graph diffs from dialogue
#[async_trait]
pub trait CrystallizationCapability: Send + Sync {
    async fn crystallize(
        &self,
        request: CrystallizationRequest<'_>,
    ) -> Result<CrystallizationPayload, GenerationError>;
}
