//! Folding engine events into run state.

use super::EngineEvent;
use crate::argument::graph::{ApplyReport, ArgumentGraph};
use crate::core::persona::PersonaId;
use crate::dialogue::controller::DebatePolicy;
use crate::dialogue::crux::Crux;
use crate::dialogue::state::ControllerState;
use crate::dialogue::turn::{DialogueTurn, TokenUsage};
use serde::{Deserialize, Serialize};

/// Lifecycle of a run as seen from its events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Running,
    Complete,
    Error,
}

/// Counters for problems recovered inside the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDiagnostics {
    pub crystallizations: usize,
    /// Payloads that failed validation and were replaced by an empty diff
    pub malformed_crystallizations: usize,
    /// Attacks with a missing endpoint plus updates of unknown arguments
    pub invariant_violations: usize,
    pub duplicate_attacks: usize,
}

/// Everything a debate run owns, rebuilt event by event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateLedger {
    pub topic: String,
    pub persona_ids: Vec<PersonaId>,
    pub max_turns: usize,
    pub policy: DebatePolicy,
    pub state: ControllerState,
    pub graph: ArgumentGraph,
    pub transcript: Vec<DialogueTurn>,
    pub crux: Option<Crux>,
    pub token_usage: TokenUsage,
    pub diagnostics: EngineDiagnostics,
    pub status: RunStatus,
    pub error: Option<String>,
}

impl Default for DebateLedger {
    fn default() -> Self {
        let policy = DebatePolicy::default();
        Self {
            topic: String::new(),
            persona_ids: Vec::new(),
            max_turns: 0,
            state: ControllerState::new(policy.circling_window),
            policy,
            graph: ArgumentGraph::new(),
            transcript: Vec::new(),
            crux: None,
            token_usage: TokenUsage::default(),
            diagnostics: EngineDiagnostics::default(),
            status: RunStatus::Running,
            error: None,
        }
    }
}

impl DebateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a whole event sequence in order.
    pub fn replay<'a>(events: impl IntoIterator<Item = &'a EngineEvent>) -> Self {
        let mut ledger = Self::new();
        for event in events {
            ledger.apply(event);
        }
        ledger
    }

    /// Apply one event. Returns the diff report for crystallization events.
    pub fn apply(&mut self, event: &EngineEvent) -> Option<ApplyReport> {
        match event {
            EngineEvent::EngineStart {
                topic,
                persona_ids,
                max_turns,
                policy,
            } => {
                *self = Self {
                    topic: topic.clone(),
                    persona_ids: persona_ids.clone(),
                    max_turns: *max_turns,
                    policy: *policy,
                    state: ControllerState::new(policy.circling_window),
                    ..Self::default()
                };
            }
            EngineEvent::PhaseTransition {
                turn_index,
                transition,
            } => {
                self.state.enter_phase(transition, *turn_index);
            }
            EngineEvent::DialogueTurn { turn, token_usage } => {
                self.state.record_turn(turn);
                self.transcript.push(turn.clone());
                self.token_usage.add(token_usage);
            }
            EngineEvent::Crystallization {
                turn_index,
                persona_id,
                diff,
                malformed,
                token_usage,
                ..
            } => {
                let report = self.graph.apply(diff, persona_id, *turn_index);
                self.state.record_crystallization();
                self.token_usage.add(token_usage);

                self.diagnostics.crystallizations += 1;
                if malformed.is_some() {
                    self.diagnostics.malformed_crystallizations += 1;
                }
                self.diagnostics.invariant_violations += report.invariant_violations();
                self.diagnostics.duplicate_attacks += report.duplicate_attacks;

                if let Some(challenged) = self.challenged_by(&report, persona_id) {
                    self.state.record_challenge(challenged);
                }
                return Some(report);
            }
            EngineEvent::Concession { concession } => {
                self.state.record_concession(concession.clone());
            }
            EngineEvent::CruxProposed { crux, .. } => {
                self.crux = Some(crux.clone());
            }
            EngineEvent::ConvergenceCheck { check, .. } => {
                self.state.record_frontier(check.contested_frontier);
            }
            EngineEvent::EngineComplete { .. } => {
                self.status = RunStatus::Complete;
            }
            EngineEvent::EngineError { message, .. } => {
                self.status = RunStatus::Error;
                self.error = Some(message.clone());
            }
            EngineEvent::PhaseStart { .. }
            | EngineEvent::Steering { .. }
            | EngineEvent::GraphUpdated { .. } => {}
        }
        None
    }

    /// Owner of the last argument (by someone else) that a diff attacked
    fn challenged_by(&self, report: &ApplyReport, attacker: &PersonaId) -> Option<PersonaId> {
        report
            .added_attacks
            .iter()
            .rev()
            .filter_map(|id| self.graph.attacks().iter().find(|k| &k.id == id))
            .filter_map(|k| self.graph.argument(&k.target))
            .map(|target| &target.speaker_id)
            .find(|speaker| *speaker != attacker)
            .cloned()
    }

    pub fn last_speaker(&self) -> Option<&PersonaId> {
        self.transcript.last().map(|t| &t.persona_id)
    }

    pub fn next_turn_index(&self) -> usize {
        self.transcript.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::diff::{CrystallizationResult, NewArgument, NewAttack};
    use crate::convergence::ConvergenceCheck;
    use crate::dialogue::phase::{DebatePhase, PhaseTransition, TransitionReason};
    use crate::dialogue::turn::Move;

    fn start() -> EngineEvent {
        EngineEvent::EngineStart {
            topic: "Cars in cities".to_string(),
            persona_ids: vec!["x".into(), "y".into()],
            max_turns: 6,
            policy: DebatePolicy::default(),
        }
    }

    fn turn_event(index: usize, persona: &str, move_type: Move) -> EngineEvent {
        EngineEvent::DialogueTurn {
            turn: DialogueTurn::new(
                index,
                DebatePhase::Opening,
                persona,
                "...",
                move_type,
                "2026-01-01T00:00:00Z",
            ),
            token_usage: TokenUsage::new(10, 20),
        }
    }

    fn crystallization(index: usize, persona: &str, diff: CrystallizationResult) -> EngineEvent {
        EngineEvent::Crystallization {
            turn_index: index,
            persona_id: persona.into(),
            covered_turns: vec![index],
            diff,
            malformed: None,
            token_usage: TokenUsage::default(),
        }
    }

    fn sample_events() -> Vec<EngineEvent> {
        vec![
            start(),
            turn_event(1, "x", Move::Claim),
            crystallization(
                1,
                "x",
                CrystallizationResult::empty().with_argument(NewArgument::new("x1", "Ban cars")),
            ),
            turn_event(2, "y", Move::Claim),
            crystallization(
                2,
                "y",
                CrystallizationResult::empty()
                    .with_argument(NewArgument::new("y1", "Cars carry goods"))
                    .with_attack(NewAttack::new("y1", "x1"))
                    .with_attack(NewAttack::new("y1", "ghost")),
            ),
            EngineEvent::ConvergenceCheck {
                turn_index: 2,
                check: ConvergenceCheck {
                    contested_frontier: 0,
                    frontier_stable: false,
                    recent_concessions: 0,
                    converged: false,
                },
                circling: false,
            },
            EngineEvent::PhaseTransition {
                turn_index: 3,
                transition: PhaseTransition {
                    from: DebatePhase::Opening,
                    to: DebatePhase::Exchange,
                    reason: TransitionReason::AllOpened,
                    forced: false,
                },
            },
        ]
    }

    #[test]
    fn test_replay_rebuilds_state() {
        let ledger = DebateLedger::replay(&sample_events());
        assert_eq!(ledger.topic, "Cars in cities");
        assert_eq!(ledger.transcript.len(), 2);
        assert_eq!(ledger.graph.len(), 2);
        assert_eq!(ledger.graph.attack_count(), 1);
        assert_eq!(ledger.state.phase, DebatePhase::Exchange);
        assert_eq!(ledger.state.contested_frontier_history, vec![0]);
        assert_eq!(ledger.token_usage.total(), 60);
        assert_eq!(ledger.diagnostics.invariant_violations, 1);
        assert_eq!(ledger.state.last_challenged, Some(PersonaId::new("x")));
        assert_eq!(ledger.status, RunStatus::Running);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let events = sample_events();
        assert_eq!(DebateLedger::replay(&events), DebateLedger::replay(&events));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut events = sample_events();
        events.push(start());
        let ledger = DebateLedger::replay(&events);
        assert!(ledger.transcript.is_empty());
        assert!(ledger.graph.is_empty());
        assert_eq!(ledger.state.phase, DebatePhase::Opening);
    }

    #[test]
    fn test_error_event_sets_status() {
        let mut events = sample_events();
        events.push(EngineEvent::EngineError {
            turn_index: 3,
            kind: crate::event::EngineErrorKind::GenerationFailure,
            message: "timeout".to_string(),
        });
        let ledger = DebateLedger::replay(&events);
        assert_eq!(ledger.status, RunStatus::Error);
        assert_eq!(ledger.error.as_deref(), Some("timeout"));
        // partial progress survives
        assert_eq!(ledger.graph.len(), 2);
    }
}
