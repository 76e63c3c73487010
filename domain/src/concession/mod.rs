//! Concession tracking
//!
//! A concession is read off the diff a crystallization actually applied.
//! Full and scope-narrowing concessions also need the move (and marker) of
//! the turn that triggered it; a partial one is the diff alone. Nothing here
//! looks at dialogue text.

use crate::argument::entities::ArgumentId;
use crate::argument::graph::ApplyReport;
use crate::core::persona::PersonaId;
use crate::dialogue::turn::{DialogueTurn, Move};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcessionType {
    /// The speaker withdrew one or more of their own arguments
    Full,
    /// The speaker changed the assumptions behind their own argument
    Partial,
    /// The speaker rewrote their own claim into a narrower one
    ScopeNarrowing,
}

impl ConcessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConcessionType::Full => "full",
            ConcessionType::Partial => "partial",
            ConcessionType::ScopeNarrowing => "scope_narrowing",
        }
    }
}

impl std::fmt::Display for ConcessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concession {
    pub turn_index: usize,
    pub persona_id: PersonaId,
    #[serde(rename = "type")]
    pub concession_type: ConcessionType,
    /// Claim text as it stood before the concession
    pub conceded_claim: String,
    /// One-line summary of what changed
    pub effect: String,
    #[serde(default)]
    pub removed_arg_ids: Vec<ArgumentId>,
    #[serde(default)]
    pub updated_arg_ids: Vec<ArgumentId>,
}

/// Classify the concession (if any) a crystallization represents.
///
/// `turn` is the turn that triggered the crystallization; its speaker is
/// the one whose own arguments are inspected. Precedence is full, then
/// scope narrowing, then partial. At most one concession is produced.
///
/// Requalifying one's own argument (assumptions changed, claim and id kept)
/// is a partial concession whatever the move.
pub fn detect_concession(turn: &DialogueTurn, report: &ApplyReport) -> Option<Concession> {
    let speaker = &turn.persona_id;
    let move_type = turn.move_type;

    let own_removed: Vec<_> = report
        .removed_args
        .iter()
        .filter(|a| &a.speaker_id == speaker)
        .collect();

    if move_type == Move::Concede && !own_removed.is_empty() {
        let conceded_claim = own_removed
            .iter()
            .map(|a| a.claim.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let effect = if own_removed.len() == 1 {
            format!("withdrew argument {}", own_removed[0].id)
        } else {
            format!("withdrew {} arguments", own_removed.len())
        };
        return Some(Concession {
            turn_index: turn.turn_index,
            persona_id: speaker.clone(),
            concession_type: ConcessionType::Full,
            conceded_claim,
            effect,
            removed_arg_ids: own_removed.iter().map(|a| a.id.clone()).collect(),
            updated_arg_ids: Vec::new(),
        });
    }

    let own_updates: Vec<_> = report
        .updated_args
        .iter()
        .filter(|u| &u.previous.speaker_id == speaker)
        .collect();

    let narrowing_allowed = move_type == Move::Concede
        || (move_type == Move::Reframe && turn.markers.concession_signal);
    let reworded: Vec<_> = own_updates
        .iter()
        .filter(|u| u.effect.claim_changed)
        .collect();
    if narrowing_allowed && !reworded.is_empty() {
        return Some(Concession {
            turn_index: turn.turn_index,
            persona_id: speaker.clone(),
            concession_type: ConcessionType::ScopeNarrowing,
            conceded_claim: reworded[0].previous.claim.clone(),
            effect: format!("narrowed the claim of {}", reworded[0].previous.id),
            removed_arg_ids: Vec::new(),
            updated_arg_ids: reworded.iter().map(|u| u.previous.id.clone()).collect(),
        });
    }

    let requalified: Vec<_> = own_updates
        .iter()
        .filter(|u| u.effect.assumptions_changed && !u.effect.claim_changed)
        .collect();
    if !requalified.is_empty() {
        return Some(Concession {
            turn_index: turn.turn_index,
            persona_id: speaker.clone(),
            concession_type: ConcessionType::Partial,
            conceded_claim: requalified[0].previous.claim.clone(),
            effect: format!("revised the assumptions of {}", requalified[0].previous.id),
            removed_arg_ids: Vec::new(),
            updated_arg_ids: requalified.iter().map(|u| u.previous.id.clone()).collect(),
        });
    }

    None
}
