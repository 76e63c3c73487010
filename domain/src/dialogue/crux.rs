//! Crux: the root disagreement the debate converges on.

use super::turn::{DialogueTurn, Move};
use crate::core::persona::PersonaId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A crux statement offered by a turn source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CruxProposal {
    pub statement: String,
    #[serde(default)]
    pub assumptions: BTreeSet<String>,
}

impl CruxProposal {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            assumptions: BTreeSet::new(),
        }
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.insert(assumption.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crux {
    pub statement: String,
    pub assumptions: BTreeSet<String>,
    /// Personas who proposed or endorsed the crux
    pub proposed_by: BTreeSet<PersonaId>,
    /// Set once a persona other than the original proposer endorses it
    pub acknowledged: bool,
    pub proposed_at_turn: usize,
}

impl Crux {
    pub fn propose(proposal: &CruxProposal, persona: &PersonaId, turn_index: usize) -> Self {
        Self {
            statement: proposal.statement.clone(),
            assumptions: proposal.assumptions.clone(),
            proposed_by: BTreeSet::from([persona.clone()]),
            acknowledged: false,
            proposed_at_turn: turn_index,
        }
    }

    /// Record an endorsement. Returns `true` if anything changed.
    pub fn endorse(&mut self, persona: &PersonaId) -> bool {
        if !self.proposed_by.insert(persona.clone()) {
            return false;
        }
        self.acknowledged = self.proposed_by.len() > 1;
        true
    }
}

/// Work out how a turn changes the crux.
///
/// Returns the new crux when the turn proposes one (and none exists yet, or
/// the proposer restates an unacknowledged one) or when a different persona endorses
/// the current crux via PROPOSE_CRUX or the acknowledgment marker.
/// `None` means the crux is unchanged.
pub fn crux_after_turn(
    current: Option<&Crux>,
    turn: &DialogueTurn,
    proposal: Option<&CruxProposal>,
) -> Option<Crux> {
    let endorses = turn.move_type == Move::ProposeCrux || turn.markers.acknowledges_crux;

    match current {
        Some(crux) if crux.acknowledged => {
            if !endorses || crux.proposed_by.contains(&turn.persona_id) {
                return None;
            }
            let mut updated = crux.clone();
            updated.endorse(&turn.persona_id);
            Some(updated)
        }
        Some(crux) => {
            if endorses && !crux.proposed_by.contains(&turn.persona_id) {
                let mut updated = crux.clone();
                updated.endorse(&turn.persona_id);
                return Some(updated);
            }
            // The original proposer may restate it
            match proposal {
                Some(p) if turn.move_type == Move::ProposeCrux && p.statement != crux.statement => {
                    Some(Crux::propose(p, &turn.persona_id, turn.turn_index))
                }
                _ => None,
            }
        }
        None if turn.move_type == Move::ProposeCrux => {
            let proposal = proposal
                .filter(|p| !p.statement.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| CruxProposal::new(turn.dialogue.trim()));
            if proposal.statement.is_empty() {
                return None;
            }
            Some(Crux::propose(&proposal, &turn.persona_id, turn.turn_index))
        }
        None => None,
    }
}
