//! Turn generation port
//!
//! Defines the interface to the external capability that writes each
//! persona's next turn. Natural-language judgment lives behind this port:
//! the engine receives the move, the prose and a few structured markers,
//! never free text it has to interpret.

use async_trait::async_trait;
use dialectic_domain::{
    CruxProposal, DebatePhase, DialogueTurn, GraphSummary, Move, PersonaId, TokenUsage, Topic,
};
use thiserror::Error;

/// Errors from the generation capabilities (turn writing and crystallization)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("No more scripted turns")]
    Exhausted,

    #[error("Other error: {0}")]
    Other(String),
}

/// Everything the generator gets to write one turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    pub topic: &'a Topic,
    pub phase: DebatePhase,
    pub turn_index: usize,
    pub transcript: &'a [DialogueTurn],
    pub speaker: &'a PersonaId,
    pub steering_hint: Option<&'a str>,
    pub graph_summary: &'a GraphSummary,
}

/// A turn as produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTurn {
    pub dialogue: String,
    pub move_type: Move,
    /// The speaker signals a concession in language
    pub concession_signal: bool,
    /// The speaker accepts the currently proposed crux
    pub acknowledges_crux: bool,
    /// Crux statement offered with a PROPOSE_CRUX move
    pub crux: Option<CruxProposal>,
    pub token_usage: TokenUsage,
}

impl GeneratedTurn {
    pub fn new(dialogue: impl Into<String>, move_type: Move) -> Self {
        Self {
            dialogue: dialogue.into(),
            move_type,
            concession_signal: false,
            acknowledges_crux: false,
            crux: None,
            token_usage: TokenUsage::default(),
        }
    }

    pub fn with_concession_signal(mut self) -> Self {
        self.concession_signal = true;
        self
    }

    pub fn acknowledging_crux(mut self) -> Self {
        self.acknowledges_crux = true;
        self
    }

    pub fn with_crux(mut self, crux: CruxProposal) -> Self {
        self.crux = Some(crux);
        self
    }

    pub fn with_token_usage(mut self, usage: TokenUsage) -> Self {
        self.token_usage = usage;
        self
    }
}

/// Port for writing debate turns
///
/// Implementations (adapters) live in the infrastructure layer. Any error
/// is fatal to the run; retries belong inside the adapter.
#[async_trait]
pub trait TurnGenerator: Send + Sync {
    async fn generate_turn(&self, request: TurnRequest<'_>) -> Result<GeneratedTurn, GenerationError>;
}
