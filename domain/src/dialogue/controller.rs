//! Dialogue controller rules
//!
//! Pure decisions the engine takes after each turn: who speaks next, what
//! steering hint to give, whether to crystallize, and whether to change
//! phase or stop. The engine owns the loop; these functions only read
//! [`ControllerState`].

use super::crux::Crux;
use super::phase::{DebatePhase, PhaseTransition, TransitionReason};
use super::state::ControllerState;
use super::turn::Move;
use crate::convergence::{ConvergenceCheck, frontier_non_increasing};
use crate::core::persona::PersonaId;
use serde::{Deserialize, Serialize};

/// Thresholds of the phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebatePolicy {
    /// Phase 2 turns with a non-increasing frontier before seeking a crux
    pub stall_turns: usize,
    /// Phase 3 turns allowed before moving on without a crux
    pub crux_turn_budget: usize,
    /// Turns considered by the convergence detector
    pub convergence_window: usize,
    /// Moves considered by circling detection
    pub circling_window: usize,
    /// CLARIFY turns may skip crystallization for at most this many turns
    pub crystallize_window: usize,
}

impl Default for DebatePolicy {
    fn default() -> Self {
        Self {
            stall_turns: 3,
            crux_turn_budget: 4,
            convergence_window: 4,
            circling_window: 4,
            crystallize_window: 2,
        }
    }
}

/// Direction of the contested frontier over the last two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierTrend {
    Rising,
    Flat,
    Falling,
}

impl FrontierTrend {
    pub fn from_history(history: &[usize]) -> Self {
        match history {
            [.., prev, last] if last > prev => FrontierTrend::Rising,
            [.., prev, last] if last < prev => FrontierTrend::Falling,
            _ => FrontierTrend::Flat,
        }
    }
}

/// Pick the next speaker.
///
/// Opening: participants in order, each once. Afterwards round-robin from
/// the last speaker, except that a persona whose argument was just attacked
/// by someone else gets the floor to respond.
pub fn next_speaker(
    participants: &[PersonaId],
    state: &ControllerState,
    last_speaker: Option<&PersonaId>,
) -> Option<PersonaId> {
    if participants.is_empty() {
        return None;
    }

    if state.phase == DebatePhase::Opening
        && let Some(pending) = participants.iter().find(|p| !state.opened.contains(*p))
    {
        return Some(pending.clone());
    }

    if let Some(challenged) = &state.last_challenged
        && Some(challenged) != last_speaker
        && participants.contains(challenged)
    {
        return Some(challenged.clone());
    }

    let next = match last_speaker.and_then(|s| participants.iter().position(|p| p == s)) {
        Some(i) => (i + 1) % participants.len(),
        None => 0,
    };
    Some(participants[next].clone())
}

/// Steering hint for the next turn, keyed by phase, frontier trend and the
/// crux. `None` means the speaker gets no hint.
pub fn steering_hint(state: &ControllerState, crux: Option<&Crux>) -> Option<String> {
    if state.circling_detected {
        return Some("Make a concrete claim or challenge instead of rephrasing.".to_string());
    }

    let trend = FrontierTrend::from_history(&state.contested_frontier_history);
    let hint = match (state.phase, trend) {
        (DebatePhase::Opening, _) => {
            "Open with your core position and the assumptions it rests on.".to_string()
        }
        (DebatePhase::Exchange, FrontierTrend::Rising) => {
            "Pick the strongest open challenge and answer it directly.".to_string()
        }
        (DebatePhase::Exchange, FrontierTrend::Flat) => {
            "Challenge a specific assumption behind an opposing argument.".to_string()
        }
        (DebatePhase::Exchange, FrontierTrend::Falling) => return None,
        (DebatePhase::CruxSeeking, _) => match crux {
            None => "Name the single disagreement that would change your mind if resolved."
                .to_string(),
            Some(c) if !c.acknowledged => {
                format!("Say whether you accept the proposed crux: {}", c.statement)
            }
            Some(c) => format!("Test the agreed crux against your arguments: {}", c.statement),
        },
        (DebatePhase::Resolution, FrontierTrend::Rising) => {
            "Stop opening new fronts and address the crux.".to_string()
        }
        (DebatePhase::Resolution, _) => {
            "Concede what you no longer defend, or state what would change your view.".to_string()
        }
    };
    Some(hint)
}

/// CLARIFY turns are batched; everything else is crystallized at once.
/// `turns_since_last_crystallization` must already count the current turn.
/// The window is inclusive: a batch holds at most `crystallize_window` turns.
pub fn should_crystallize(state: &ControllerState, move_type: Move, policy: &DebatePolicy) -> bool {
    move_type != Move::Clarify
        || state.turns_since_last_crystallization >= policy.crystallize_window.max(1)
}

/// Phase change warranted by the state after the current turn.
pub fn next_transition(
    state: &ControllerState,
    participants: &[PersonaId],
    crux: Option<&Crux>,
    policy: &DebatePolicy,
) -> Option<PhaseTransition> {
    let transition = |to: DebatePhase, reason: TransitionReason| PhaseTransition {
        from: state.phase,
        to,
        reason,
        forced: reason == TransitionReason::Circling,
    };

    match state.phase {
        DebatePhase::Opening => state
            .all_opened(participants)
            .then(|| transition(DebatePhase::Exchange, TransitionReason::AllOpened)),
        DebatePhase::Exchange => {
            if state.circling_detected {
                Some(transition(DebatePhase::CruxSeeking, TransitionReason::Circling))
            } else if state.turns_in_phase >= policy.stall_turns.max(1)
                && frontier_non_increasing(&state.contested_frontier_history, policy.stall_turns)
            {
                Some(transition(
                    DebatePhase::CruxSeeking,
                    TransitionReason::FrontierStalled,
                ))
            } else {
                None
            }
        }
        DebatePhase::CruxSeeking => {
            if crux.is_some_and(|c| c.acknowledged) {
                Some(transition(
                    DebatePhase::Resolution,
                    TransitionReason::CruxAcknowledged,
                ))
            } else if state.turns_in_phase >= policy.crux_turn_budget.max(1) {
                Some(transition(
                    DebatePhase::Resolution,
                    TransitionReason::CruxBudgetExhausted,
                ))
            } else if state.circling_detected {
                Some(transition(DebatePhase::Resolution, TransitionReason::Circling))
            } else {
                None
            }
        }
        DebatePhase::Resolution => None,
    }
}

/// Why the run should stop after the current turn, if it should.
pub fn completion_reason(
    state: &ControllerState,
    convergence: &ConvergenceCheck,
    turn_index: usize,
    max_turns: usize,
) -> Option<TransitionReason> {
    if state.phase == DebatePhase::Resolution && convergence.converged {
        Some(TransitionReason::Converged)
    } else if turn_index >= max_turns {
        Some(TransitionReason::TurnBudgetExhausted)
    } else {
        None
    }
}
