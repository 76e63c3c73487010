//! Per-run controller state.
//!
//! One [`ControllerState`] exists per debate run. The engine and the event
//! replay both drive it through the same `record_*` methods, so a replayed
//! event stream rebuilds exactly the state the engine had.

use super::phase::{DebatePhase, PhaseTransition};
use super::turn::{DialogueTurn, Move};
use crate::concession::Concession;
use crate::core::persona::PersonaId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub phase: DebatePhase,
    /// Turns recorded since the last crystallization (including the current one)
    pub turns_since_last_crystallization: usize,
    /// CLAIM / CHALLENGE / CONCEDE / PROPOSE_CRUX moves in `recent_moves`
    pub substantive_moves_in_window: usize,
    /// Last `circling_window` moves, oldest first
    pub recent_moves: VecDeque<Move>,
    pub circling_window: usize,
    /// One contested-frontier sample per turn
    pub contested_frontier_history: Vec<usize>,
    pub concessions: Vec<Concession>,
    pub circling_detected: bool,
    /// Turn index at which each phase was entered
    pub phase_started_at: BTreeMap<DebatePhase, usize>,
    pub turns_in_phase: usize,
    /// Participants who produced an opening turn
    pub opened: BTreeSet<PersonaId>,
    /// Persona whose argument was most recently attacked by someone else,
    /// cleared once that persona speaks
    pub last_challenged: Option<PersonaId>,
    pub turns_taken: usize,
}

impl ControllerState {
    pub fn new(circling_window: usize) -> Self {
        Self {
            phase: DebatePhase::Opening,
            turns_since_last_crystallization: 0,
            substantive_moves_in_window: 0,
            recent_moves: VecDeque::with_capacity(circling_window),
            circling_window: circling_window.max(1),
            contested_frontier_history: Vec::new(),
            concessions: Vec::new(),
            circling_detected: false,
            phase_started_at: BTreeMap::from([(DebatePhase::Opening, 1)]),
            turns_in_phase: 0,
            opened: BTreeSet::new(),
            last_challenged: None,
            turns_taken: 0,
        }
    }

    pub fn record_turn(&mut self, turn: &DialogueTurn) {
        self.turns_taken = self.turns_taken.max(turn.turn_index);
        self.turns_in_phase += 1;
        self.turns_since_last_crystallization += 1;

        if turn.phase == DebatePhase::Opening {
            self.opened.insert(turn.persona_id.clone());
        }
        if self.last_challenged.as_ref() == Some(&turn.persona_id) {
            self.last_challenged = None;
        }

        self.recent_moves.push_back(turn.move_type);
        while self.recent_moves.len() > self.circling_window {
            self.recent_moves.pop_front();
        }
        self.substantive_moves_in_window = self
            .recent_moves
            .iter()
            .filter(|m| m.is_substantive())
            .count();
        self.circling_detected =
            self.recent_moves.len() == self.circling_window && self.substantive_moves_in_window == 0;
    }

    pub fn record_crystallization(&mut self) {
        self.turns_since_last_crystallization = 0;
    }

    pub fn record_challenge(&mut self, persona: PersonaId) {
        self.last_challenged = Some(persona);
    }

    pub fn record_frontier(&mut self, contested_frontier: usize) {
        self.contested_frontier_history.push(contested_frontier);
    }

    pub fn record_concession(&mut self, concession: Concession) {
        self.concessions.push(concession);
    }

    /// Enter the transition's target phase, effective from `turn_index`.
    ///
    /// Backward transitions are ignored and return `false`. The move window
    /// restarts so circling is judged within the new phase.
    pub fn enter_phase(&mut self, transition: &PhaseTransition, turn_index: usize) -> bool {
        if transition.to <= self.phase {
            return false;
        }
        self.phase = transition.to;
        self.phase_started_at.insert(transition.to, turn_index);
        self.turns_in_phase = 0;
        self.recent_moves.clear();
        self.substantive_moves_in_window = 0;
        self.circling_detected = false;
        true
    }

    pub fn all_opened(&self, participants: &[PersonaId]) -> bool {
        participants.iter().all(|p| self.opened.contains(p))
    }
}
