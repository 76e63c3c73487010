//! Run Debate use case
//!
//! Drives one debate from the opening turn to completion: pick the speaker,
//! steer, generate the turn, crystallize it into the argument graph,
//! recompute semantics, detect concessions and convergence, then advance
//! the phase.

mod session;
mod types;

pub use types::{RunDebateError, RunDebateInput};

use crate::ports::crystallizer::{CrystallizationCapability, CrystallizationRequest};
use crate::ports::event_sink::{EngineEventSink, NoEvents};
use crate::ports::turn_generator::{GenerationError, TurnGenerator, TurnRequest};
use crate::use_cases::shared::{check_cancelled, with_timeout};
use chrono::Utc;
use dialectic_domain::core::string::preview;
use dialectic_domain::dialogue::controller::{
    completion_reason, next_speaker, next_transition, should_crystallize, steering_hint,
};
use dialectic_domain::dialogue::crux::crux_after_turn;
use dialectic_domain::{
    CrystallizationResult, DebateEngineOutput, DialogueTurn, EngineErrorKind, EngineEvent,
    GraphSummary, TransitionReason, TurnMarkers, check_convergence, detect_concession,
    parse_crystallization,
};
use session::DebateRun;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Use case for running a dialectical debate
pub struct RunDebateUseCase<T: TurnGenerator + 'static, C: CrystallizationCapability + 'static> {
    generator: Arc<T>,
    crystallizer: Arc<C>,
    cancellation_token: Option<CancellationToken>,
}

impl<T: TurnGenerator + 'static, C: CrystallizationCapability + 'static> RunDebateUseCase<T, C> {
    pub fn new(generator: Arc<T>, crystallizer: Arc<C>) -> Self {
        Self {
            generator,
            crystallizer,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token, checked between turns
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case without observers
    pub async fn execute(
        &self,
        input: RunDebateInput,
    ) -> Result<DebateEngineOutput, RunDebateError> {
        self.execute_with_events(input, &NoEvents).await
    }

    /// Execute the use case, streaming every engine event to `sink`
    pub async fn execute_with_events(
        &self,
        input: RunDebateInput,
        sink: &dyn EngineEventSink,
    ) -> Result<DebateEngineOutput, RunDebateError> {
        input.validate()?;

        info!(
            "Starting debate on '{}' with {} personas (max {} turns)",
            input.topic,
            input.personas.len(),
            input.params.max_turns
        );

        let mut run = DebateRun::start(&input, sink);

        loop {
            let turn_index = run.ledger.next_turn_index();

            if check_cancelled(&self.cancellation_token).is_err() {
                warn!("Debate cancelled before turn {}", turn_index);
                let partial = run.fail(
                    turn_index,
                    EngineErrorKind::Cancelled,
                    "cancelled".to_string(),
                );
                return Err(RunDebateError::Cancelled {
                    turn_index,
                    partial,
                });
            }

            match self.play_turn(&mut run, &input, turn_index).await {
                Ok(Some(reason)) => return Ok(Self::finish(run, turn_index, reason)),
                Ok(None) => {}
                Err(error) => {
                    warn!("Turn {} failed: {}", turn_index, error);
                    let partial = run.fail(
                        turn_index,
                        EngineErrorKind::GenerationFailure,
                        error.to_string(),
                    );
                    return Err(RunDebateError::GenerationFailure {
                        turn_index,
                        error,
                        partial,
                    });
                }
            }
        }
    }

    /// One full turn. Returns the completion reason when the run is over.
    async fn play_turn(
        &self,
        run: &mut DebateRun<'_>,
        input: &RunDebateInput,
        turn_index: usize,
    ) -> Result<Option<TransitionReason>, GenerationError> {
        let params = &input.params;
        let policy = params.policy;

        let speaker = next_speaker(&input.personas, &run.ledger.state, run.ledger.last_speaker())
            .ok_or_else(|| GenerationError::Other("no participants".to_string()))?;
        let phase = run.ledger.state.phase;
        let hint = steering_hint(&run.ledger.state, run.ledger.crux.as_ref());

        if let Some(hint) = &hint {
            debug!("Steering {} at turn {}: {}", speaker, turn_index, hint);
            run.emit(EngineEvent::Steering {
                turn_index,
                persona_id: speaker.clone(),
                hint: hint.clone(),
            });
        }

        let summary = GraphSummary::new(&run.ledger.graph, &run.view);
        let request = TurnRequest {
            topic: &input.topic,
            phase,
            turn_index,
            transcript: &run.ledger.transcript,
            speaker: &speaker,
            steering_hint: hint.as_deref(),
            graph_summary: &summary,
        };
        let generated = with_timeout(
            params.capability_timeout,
            self.generator.generate_turn(request),
        )
        .await?;

        let turn = DialogueTurn::new(
            turn_index,
            phase,
            speaker,
            generated.dialogue,
            generated.move_type,
            Utc::now().to_rfc3339(),
        )
        .with_steering_hint(hint)
        .with_markers(TurnMarkers {
            concession_signal: generated.concession_signal,
            acknowledges_crux: generated.acknowledges_crux,
        });

        info!(
            "Turn {} ({}): {} plays {}",
            turn_index, phase, turn.persona_id, turn.move_type
        );
        debug!("Turn {} text: {}", turn_index, preview(&turn.dialogue, 120));
        run.emit(EngineEvent::DialogueTurn {
            turn: turn.clone(),
            token_usage: generated.token_usage,
        });

        if let Some(crux) = crux_after_turn(run.ledger.crux.as_ref(), &turn, generated.crux.as_ref())
        {
            info!(
                "Crux {} by {}: {}",
                if crux.acknowledged { "acknowledged" } else { "proposed" },
                turn.persona_id,
                crux.statement
            );
            run.emit(EngineEvent::CruxProposed { turn_index, crux });
        }

        if should_crystallize(&run.ledger.state, turn.move_type, &policy) {
            self.crystallize(run, input, &turn).await?;
        } else {
            debug!("Deferring crystallization of turn {}", turn_index);
        }

        let mut history = run.ledger.state.contested_frontier_history.clone();
        history.push(run.view.contested_frontier);
        let check = check_convergence(
            &history,
            &run.ledger.state.concessions,
            turn_index,
            policy.convergence_window,
        );
        let circling = run.ledger.state.circling_detected;
        if circling {
            debug!("Circling detected at turn {}", turn_index);
        }
        run.emit(EngineEvent::ConvergenceCheck {
            turn_index,
            check,
            circling,
        });

        if let Some(reason) =
            completion_reason(&run.ledger.state, &check, turn_index, params.max_turns)
        {
            if run.ledger.state.turns_since_last_crystallization > 0 {
                debug!(
                    "Flushing {} deferred turns before completion",
                    run.ledger.state.turns_since_last_crystallization
                );
                self.crystallize(run, input, &turn).await?;
            }
            return Ok(Some(reason));
        }

        if let Some(transition) = next_transition(
            &run.ledger.state,
            &input.personas,
            run.ledger.crux.as_ref(),
            &policy,
        ) {
            info!(
                "{} -> {}: {}",
                transition.from,
                transition.to,
                transition.reason.description()
            );
            let to = transition.to;
            run.emit(EngineEvent::PhaseTransition {
                turn_index: turn_index + 1,
                transition,
            });
            run.emit(EngineEvent::PhaseStart {
                phase: to,
                turn_index: turn_index + 1,
            });
        }

        Ok(None)
    }

    /// Turn the triggering turn (plus deferred ones) into a graph diff and
    /// apply it. A malformed payload becomes an empty diff.
    async fn crystallize(
        &self,
        run: &mut DebateRun<'_>,
        input: &RunDebateInput,
        turn: &DialogueTurn,
    ) -> Result<(), GenerationError> {
        let turn_index = turn.turn_index;
        let deferred = run
            .ledger
            .state
            .turns_since_last_crystallization
            .saturating_sub(1);
        let end = run.ledger.transcript.len().saturating_sub(1);
        let pending_turns = &run.ledger.transcript[end.saturating_sub(deferred)..end];
        let snapshot = run.ledger.graph.snapshot();

        let payload = with_timeout(
            input.params.capability_timeout,
            self.crystallizer.crystallize(CrystallizationRequest {
                topic: &input.topic,
                turn,
                pending_turns,
                snapshot: &snapshot,
            }),
        )
        .await?;

        let covered_turns: Vec<usize> = pending_turns
            .iter()
            .map(|t| t.turn_index)
            .chain(std::iter::once(turn_index))
            .collect();

        let (diff, malformed) = match parse_crystallization(&payload.payload, &run.ledger.graph) {
            Ok(diff) => (diff, None),
            Err(e) => {
                warn!(
                    "Malformed crystallization at turn {}, applying empty diff: {}",
                    turn_index, e
                );
                (CrystallizationResult::empty(), Some(e.to_string()))
            }
        };

        let report = run
            .emit(EngineEvent::Crystallization {
                turn_index,
                persona_id: turn.persona_id.clone(),
                covered_turns,
                diff,
                malformed,
                token_usage: payload.token_usage,
            })
            .unwrap_or_default();

        let invariant_violations = report.invariant_violations();
        if invariant_violations > 0 {
            warn!(
                "Dropped {} inconsistent graph edits at turn {}",
                invariant_violations, turn_index
            );
        }

        run.refresh_view();
        let updated = EngineEvent::GraphUpdated {
            turn_index,
            labels: run.view.labels.clone(),
            grounded: run.view.grounded.clone(),
            camps: run.view.camps.clone(),
            contested_frontier: run.view.contested_frontier,
            invariant_violations,
        };
        run.emit(updated);

        if let Some(concession) = detect_concession(turn, &report) {
            info!(
                "{} conceded at turn {} ({}): {}",
                concession.persona_id,
                turn_index,
                concession.concession_type.as_str(),
                concession.effect
            );
            run.emit(EngineEvent::Concession { concession });
        }

        Ok(())
    }

    fn finish(
        mut run: DebateRun<'_>,
        turn_index: usize,
        reason: TransitionReason,
    ) -> DebateEngineOutput {
        let verdict = run.output();
        info!(
            "Debate complete after {} turns ({}): {}",
            turn_index,
            reason.description(),
            verdict.regime
        );
        run.emit(EngineEvent::EngineComplete {
            turn_index,
            reason,
            regime: verdict.regime,
            regime_description: verdict.regime_description,
        });
        run.output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineParams;
    use crate::ports::crystallizer::CrystallizationPayload;
    use crate::ports::event_sink::RecordingSink;
    use crate::ports::turn_generator::GeneratedTurn;
    use async_trait::async_trait;
    use dialectic_domain::{
        ArgumentId, CruxProposal, DebateLedger, DebatePhase, DomainError, Move, PersonaId, Regime,
        RunStatus, TokenUsage,
    };
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Mocks ====================

    struct ScriptedGenerator {
        turns: Mutex<VecDeque<Result<GeneratedTurn, GenerationError>>>,
        speakers: Mutex<Vec<PersonaId>>,
        hints: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedGenerator {
        fn new(turns: Vec<GeneratedTurn>) -> Self {
            Self::with_results(turns.into_iter().map(Ok).collect())
        }

        fn with_results(turns: Vec<Result<GeneratedTurn, GenerationError>>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                speakers: Mutex::new(Vec::new()),
                hints: Mutex::new(Vec::new()),
            }
        }

        fn speakers(&self) -> Vec<String> {
            self.speakers
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.to_string())
                .collect()
        }
    }

    #[async_trait]
    impl TurnGenerator for ScriptedGenerator {
        async fn generate_turn(
            &self,
            request: TurnRequest<'_>,
        ) -> Result<GeneratedTurn, GenerationError> {
            self.speakers.lock().unwrap().push(request.speaker.clone());
            self.hints
                .lock()
                .unwrap()
                .push(request.steering_hint.map(str::to_string));
            self.turns
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(GenerationError::Exhausted))
        }
    }

    struct ScriptedCrystallizer {
        payloads: Mutex<VecDeque<Value>>,
        covered: Mutex<Vec<Vec<usize>>>,
    }

    impl ScriptedCrystallizer {
        fn new(payloads: Vec<Value>) -> Self {
            Self {
                payloads: Mutex::new(payloads.into()),
                covered: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CrystallizationCapability for ScriptedCrystallizer {
        async fn crystallize(
            &self,
            request: CrystallizationRequest<'_>,
        ) -> Result<CrystallizationPayload, GenerationError> {
            let mut covered: Vec<usize> =
                request.pending_turns.iter().map(|t| t.turn_index).collect();
            covered.push(request.turn.turn_index);
            self.covered.lock().unwrap().push(covered);
            let payload = self.payloads.lock().unwrap().pop_front().unwrap_or(Value::Null);
            Ok(CrystallizationPayload::new(payload).with_token_usage(TokenUsage::new(1, 1)))
        }
    }

    // ==================== Helpers ====================

    fn turn(text: &str, move_type: Move) -> GeneratedTurn {
        GeneratedTurn::new(text, move_type).with_token_usage(TokenUsage::new(10, 5))
    }

    fn input(max_turns: usize) -> RunDebateInput {
        RunDebateInput::new(
            "Should cities ban private cars?",
            vec!["x".into(), "y".into()],
        )
        .with_params(EngineParams::default().with_max_turns(max_turns))
    }

    fn use_case(
        generator: ScriptedGenerator,
        crystallizer: ScriptedCrystallizer,
    ) -> (
        RunDebateUseCase<ScriptedGenerator, ScriptedCrystallizer>,
        Arc<ScriptedGenerator>,
        Arc<ScriptedCrystallizer>,
    ) {
        let generator = Arc::new(generator);
        let crystallizer = Arc::new(crystallizer);
        (
            RunDebateUseCase::new(generator.clone(), crystallizer.clone()),
            generator,
            crystallizer,
        )
    }

    fn scenario_c() -> (Vec<GeneratedTurn>, Vec<Value>) {
        let turns = vec![
            turn("Cars choke our streets.", Move::Claim),
            turn("Cars carry goods and people.", Move::Claim),
            turn("Deliveries can use cargo bikes.", Move::Challenge),
            turn("Cargo bikes cannot haul furniture.", Move::Challenge),
            turn("Vans can be exempted, and buses scale.", Move::Claim),
            turn("Fine, the furniture point does not hold.", Move::Concede),
        ];
        let payloads = vec![
            json!({"new_args": [{"id": "x1", "claim": "Cars choke streets"}]}),
            json!({"new_args": [{"id": "y1", "claim": "Cars carry goods"}]}),
            json!({
                "new_args": [{"id": "x2", "claim": "Cargo bikes handle deliveries"}],
                "new_attacks": [{"source": "x2", "target": "y1"}]
            }),
            json!({
                "new_args": [{"id": "y2", "claim": "Cargo bikes cannot haul furniture"}],
                "new_attacks": [{"source": "y2", "target": "x2"}]
            }),
            json!({
                "new_args": [
                    {"id": "x3", "claim": "Vans can be exempted"},
                    {"id": "x4", "claim": "Buses scale"}
                ]
            }),
            json!({"removed_arg_ids": ["y2"]}),
        ];
        (turns, payloads)
    }

    fn phases(events: &[EngineEvent]) -> Vec<DebatePhase> {
        events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::PhaseStart { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_full_debate_with_one_concession() {
        let (turns, payloads) = scenario_c();
        let (use_case, generator, _) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(payloads),
        );
        let sink = RecordingSink::new();

        let output = use_case
            .execute_with_events(input(6), &sink)
            .await
            .unwrap();

        assert_eq!(output.turns(), 6);
        assert!(output.is_complete());
        assert_eq!(output.concession_trail.len(), 1);
        let concession = &output.concession_trail[0];
        assert_eq!(concession.turn_index, 6);
        assert_eq!(concession.persona_id, PersonaId::new("y"));
        assert_eq!(concession.removed_arg_ids, vec![ArgumentId::new("y2")]);

        // 6 arguments were added, one withdrawn with its attack
        assert_eq!(output.graph.len(), 5);
        assert_eq!(output.graph.attack_count(), 1);
        assert!(output.graph.dangling_attacks().is_empty());

        // openings in order, then the challenged persona answers
        assert_eq!(generator.speakers(), vec!["x", "y", "x", "y", "x", "y"]);

        let events = sink.events();
        assert!(matches!(
            events.last(),
            Some(EngineEvent::EngineComplete {
                reason: TransitionReason::TurnBudgetExhausted,
                ..
            })
        ));
        assert_eq!(output.token_usage, TokenUsage::new(66, 36));

        // x2 defeats y1 and nothing answers it: one camp, all of it x's
        assert_eq!(output.camps.len(), 1);
        assert!(output.camps[0].persona_ids.iter().eq([&PersonaId::new("x")]));
        assert_eq!(output.common_ground.len(), 4);
        assert_eq!(output.regime, Regime::Consensus);
        assert!(output.regime_description.contains("consensus"));
    }

    #[tokio::test]
    async fn test_malformed_payload_keeps_graph_and_continues() {
        let turns = vec![
            turn("Cars choke our streets.", Move::Claim),
            turn("Cars carry goods.", Move::Claim),
            turn("Bikes carry goods too.", Move::Challenge),
            turn("Not at scale.", Move::Challenge),
        ];
        let payloads = vec![
            json!({"new_args": [{"id": "x1", "claim": "Cars choke streets"}]}),
            json!({"new_args": [{"id": "y1", "claim": "Cars carry goods"}]}),
            json!({"new_args": "not a list"}),
            json!({
                "new_args": [{"id": "y2", "claim": "Bikes do not scale"}],
                "new_attacks": [{"source": "y2", "target": "x1"}]
            }),
        ];
        let (use_case, _, _) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(payloads),
        );
        let sink = RecordingSink::new();

        let output = use_case
            .execute_with_events(input(4), &sink)
            .await
            .unwrap();
        assert!(output.is_complete());
        assert_eq!(output.diagnostics.malformed_crystallizations, 1);
        assert_eq!(output.graph.len(), 3);

        // The graph after turn 3 equals the graph before it
        let events = sink.events();
        let upto = |turn: usize| {
            let cut = events
                .iter()
                .position(|e| matches!(e, EngineEvent::ConvergenceCheck { turn_index, .. } if *turn_index == turn))
                .unwrap();
            DebateLedger::replay(&events[..=cut]).graph
        };
        assert_eq!(upto(2), upto(3));
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::Crystallization { turn_index: 3, malformed: Some(_), .. }
        )));
    }

    #[tokio::test]
    async fn test_events_replay_to_final_state() {
        let (turns, payloads) = scenario_c();
        let (use_case, _, _) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(payloads),
        );
        let sink = RecordingSink::new();
        let output = use_case
            .execute_with_events(input(6), &sink)
            .await
            .unwrap();

        let ledger = DebateLedger::replay(&sink.events());
        assert_eq!(ledger.graph, output.graph);
        assert_eq!(ledger.transcript, output.transcript);
        assert_eq!(ledger.crux, output.crux);
        assert_eq!(ledger.state.concessions, output.concession_trail);
        assert_eq!(ledger.status, RunStatus::Complete);
        let replayed = DebateEngineOutput::from_ledger(&ledger, output.duration_ms);
        assert_eq!(replayed, output);
    }

    #[tokio::test]
    async fn test_phases_never_go_backwards() {
        let mut turns = vec![
            turn("Cars choke our streets.", Move::Claim),
            turn("Cars carry goods.", Move::Claim),
        ];
        for _ in 0..10 {
            turns.push(turn("Let me put that differently.", Move::Reframe));
        }
        let (use_case, _, _) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(vec![]),
        );
        let sink = RecordingSink::new();
        let params = EngineParams::default()
            .with_max_turns(12)
            .with_stall_turns(10)
            .with_crux_turn_budget(10);
        let output = use_case
            .execute_with_events(input(12).with_params(params), &sink)
            .await
            .unwrap();

        let seen = phases(&sink.events());
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        // circling forces the run through crux seeking into resolution
        assert_eq!(
            seen,
            vec![
                DebatePhase::Opening,
                DebatePhase::Exchange,
                DebatePhase::CruxSeeking,
                DebatePhase::Resolution
            ]
        );
        assert_eq!(output.final_phase, DebatePhase::Resolution);
        // a flat frontier with no concessions converges in resolution
        assert_eq!(output.turns(), 11);
        assert!(matches!(
            sink.events().last(),
            Some(EngineEvent::EngineComplete {
                reason: TransitionReason::Converged,
                ..
            })
        ));
        assert!(sink.events().iter().any(|e| matches!(
            e,
            EngineEvent::PhaseTransition { transition, .. } if transition.forced
        )));
    }

    #[tokio::test]
    async fn test_acknowledged_crux_moves_to_resolution() {
        let turns = vec![
            turn("Cars choke our streets.", Move::Claim),
            turn("Cars carry goods.", Move::Claim),
            turn("The real question is induced demand.", Move::ProposeCrux)
                .with_crux(CruxProposal::new("Does road space induce demand?")),
            turn("Agreed, that is the question.", Move::Clarify).acknowledging_crux(),
        ];
        let (use_case, _, _) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(vec![]),
        );
        let sink = RecordingSink::new();
        let output = use_case
            .execute_with_events(input(4), &sink)
            .await
            .unwrap();

        let crux = output.crux.unwrap();
        assert!(crux.acknowledged);
        assert_eq!(crux.statement, "Does road space induce demand?");
        assert_eq!(crux.proposed_at_turn, 3);
        let crux_events = sink
            .events()
            .iter()
            .filter(|e| matches!(e, EngineEvent::CruxProposed { .. }))
            .count();
        assert_eq!(crux_events, 2);
    }

    #[tokio::test]
    async fn test_clarify_turns_are_batched() {
        let turns = vec![
            turn("Cars choke our streets.", Move::Claim),
            turn("Cars carry goods.", Move::Claim),
            turn("By cars I mean private cars.", Move::Clarify),
            turn("And I mean freight too.", Move::Clarify),
            turn("Freight can move at night.", Move::Challenge),
        ];
        let (use_case, _, crystallizer) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(vec![]),
        );
        use_case.execute(input(5)).await.unwrap();

        let covered = crystallizer.covered.lock().unwrap().clone();
        assert_eq!(covered, vec![vec![1], vec![2], vec![3, 4], vec![5]]);
    }

    #[tokio::test]
    async fn test_deferred_turns_flushed_at_turn_budget() {
        let turns = vec![
            turn("Cars choke our streets.", Move::Claim),
            turn("Cars carry goods.", Move::Claim),
            turn("By cars I mean private cars.", Move::Clarify),
        ];
        let payloads = vec![
            json!({"new_args": [{"id": "x1", "claim": "Cars choke streets"}]}),
            json!({"new_args": [{"id": "y1", "claim": "Cars carry goods"}]}),
            json!({"updated_args": [{"id": "x1", "claim": "Private cars choke streets"}]}),
        ];
        let (use_case, _, crystallizer) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(payloads),
        );
        let sink = RecordingSink::new();
        let output = use_case
            .execute_with_events(input(3), &sink)
            .await
            .unwrap();

        let covered = crystallizer.covered.lock().unwrap().clone();
        assert_eq!(covered, vec![vec![1], vec![2], vec![3]]);
        assert_eq!(
            output.graph.argument(&"x1".into()).unwrap().claim,
            "Private cars choke streets"
        );

        let events = sink.events();
        let flushed = events
            .iter()
            .position(|e| matches!(e, EngineEvent::Crystallization { turn_index: 3, .. }))
            .unwrap();
        let complete = events
            .iter()
            .position(|e| matches!(e, EngineEvent::EngineComplete { .. }))
            .unwrap();
        assert!(flushed < complete);
        assert_eq!(DebateLedger::replay(&events).graph, output.graph);
    }

    #[tokio::test]
    async fn test_concessions_only_accumulate() {
        let (turns, payloads) = scenario_c();
        let (use_case, _, _) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(payloads),
        );
        let sink = RecordingSink::new();
        use_case.execute_with_events(input(6), &sink).await.unwrap();

        let events = sink.events();
        let mut ledger = DebateLedger::new();
        let mut last = 0;
        for event in &events {
            ledger.apply(event);
            let count = ledger.state.concessions.len();
            assert!(count >= last);
            last = count;
        }
    }

    #[tokio::test]
    async fn test_cancellation_returns_partial_output() {
        let token = CancellationToken::new();
        token.cancel();
        let (use_case, _, _) = use_case(
            ScriptedGenerator::new(vec![]),
            ScriptedCrystallizer::new(vec![]),
        );
        let use_case = use_case.with_cancellation(token);
        let sink = RecordingSink::new();

        let err = use_case
            .execute_with_events(input(6), &sink)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        let partial = err.partial_output().unwrap();
        assert_eq!(partial.status, RunStatus::Error);
        assert!(partial.transcript.is_empty());
        assert!(matches!(
            sink.events().last(),
            Some(EngineEvent::EngineError {
                kind: EngineErrorKind::Cancelled,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_transcript() {
        let generator = ScriptedGenerator::with_results(vec![
            Ok(turn("Cars choke our streets.", Move::Claim)),
            Ok(turn("Cars carry goods.", Move::Claim)),
            Err(GenerationError::RequestFailed("connection reset".to_string())),
        ]);
        let payloads = vec![
            json!({"new_args": [{"id": "x1", "claim": "Cars choke streets"}]}),
            json!({"new_args": [{"id": "y1", "claim": "Cars carry goods"}]}),
        ];
        let (use_case, _, _) = use_case(generator, ScriptedCrystallizer::new(payloads));

        let err = use_case.execute(input(6)).await.unwrap_err();
        match &err {
            RunDebateError::GenerationFailure {
                turn_index, error, ..
            } => {
                assert_eq!(*turn_index, 3);
                assert_eq!(
                    *error,
                    GenerationError::RequestFailed("connection reset".to_string())
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        let partial = err.into_partial_output().unwrap();
        assert_eq!(partial.turns(), 2);
        assert_eq!(partial.graph.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_any_event() {
        let (use_case, _, _) = use_case(
            ScriptedGenerator::new(vec![]),
            ScriptedCrystallizer::new(vec![]),
        );
        let sink = RecordingSink::new();
        let input = RunDebateInput::new("Cars", vec!["x".into()]);

        let err = use_case.execute_with_events(input, &sink).await.unwrap_err();
        assert!(matches!(
            err,
            RunDebateError::InvalidInput(DomainError::NotEnoughParticipants(1))
        ));
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_opening_turns_get_opening_hint() {
        let turns = vec![
            turn("Cars choke our streets.", Move::Claim),
            turn("Cars carry goods.", Move::Claim),
        ];
        let (use_case, generator, _) = use_case(
            ScriptedGenerator::new(turns),
            ScriptedCrystallizer::new(vec![]),
        );
        use_case.execute(input(2)).await.unwrap();

        let hints = generator.hints.lock().unwrap().clone();
        assert_eq!(hints.len(), 2);
        assert!(hints.iter().all(|h| h.as_deref().is_some_and(|h| h.starts_with("Open with"))));
    }
}
