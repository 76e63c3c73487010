//! Dialogue turns and moves.

use super::phase::DebatePhase;
use crate::core::persona::PersonaId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Dialectical move a turn makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Move {
    Claim,
    Challenge,
    Clarify,
    Concede,
    Reframe,
    ProposeCrux,
}

impl Move {
    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Claim => "CLAIM",
            Move::Challenge => "CHALLENGE",
            Move::Clarify => "CLARIFY",
            Move::Concede => "CONCEDE",
            Move::Reframe => "REFRAME",
            Move::ProposeCrux => "PROPOSE_CRUX",
        }
    }

    /// Moves that push the debate forward. A window holding none of
    /// these (only REFRAME / CLARIFY) means the speakers are circling.
    pub fn is_substantive(&self) -> bool {
        !matches!(self, Move::Reframe | Move::Clarify)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "CLAIM" => Ok(Move::Claim),
            "CHALLENGE" => Ok(Move::Challenge),
            "CLARIFY" => Ok(Move::Clarify),
            "CONCEDE" => Ok(Move::Concede),
            "REFRAME" => Ok(Move::Reframe),
            "PROPOSE_CRUX" | "CRUX" => Ok(Move::ProposeCrux),
            other => Err(format!("Unknown move: {}", other)),
        }
    }
}

/// Structured signals the turn source attaches alongside the prose.
///
/// Natural-language judgment happens upstream; the engine only reads
/// these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnMarkers {
    /// The speaker signals a concession in language (used with REFRAME)
    pub concession_signal: bool,
    /// The speaker accepts the currently proposed crux
    pub acknowledges_crux: bool,
}

/// Token accounting reported by the external capabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn add(&mut self, other: &TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// One entry of the transcript. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    /// 1-based position in the transcript
    pub turn_index: usize,
    pub phase: DebatePhase,
    pub persona_id: PersonaId,
    pub dialogue: String,
    #[serde(rename = "move")]
    pub move_type: Move,
    #[serde(default)]
    pub steering_hint: Option<String>,
    #[serde(default)]
    pub markers: TurnMarkers,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl DialogueTurn {
    pub fn new(
        turn_index: usize,
        phase: DebatePhase,
        persona_id: impl Into<PersonaId>,
        dialogue: impl Into<String>,
        move_type: Move,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            turn_index,
            phase,
            persona_id: persona_id.into(),
            dialogue: dialogue.into(),
            move_type,
            steering_hint: None,
            markers: TurnMarkers::default(),
            timestamp: timestamp.into(),
        }
    }

    pub fn with_steering_hint(mut self, hint: Option<String>) -> Self {
        self.steering_hint = hint;
        self
    }

    pub fn with_markers(mut self, markers: TurnMarkers) -> Self {
        self.markers = markers;
        self
    }
}
