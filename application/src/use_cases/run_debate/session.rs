//! Per-run state for the debate use case.
//!
//! Every change goes through [`DebateRun::emit`]: the event is folded into
//! the run's ledger first and only then shown to the sink, so what a sink
//! records replays to exactly this state.

use super::types::RunDebateInput;
use crate::ports::event_sink::EngineEventSink;
use dialectic_domain::{
    ApplyReport, DebateEngineOutput, DebateLedger, DebatePhase, EngineErrorKind, EngineEvent,
    SemanticsView,
};
use std::time::Instant;

pub(super) struct DebateRun<'a> {
    pub(super) ledger: DebateLedger,
    /// Semantics of the graph as of the last crystallization
    pub(super) view: SemanticsView,
    sink: &'a dyn EngineEventSink,
    started: Instant,
}

impl<'a> DebateRun<'a> {
    /// Emit the start events for a validated input.
    pub(super) fn start(input: &RunDebateInput, sink: &'a dyn EngineEventSink) -> Self {
        let mut run = Self {
            ledger: DebateLedger::new(),
            view: SemanticsView::default(),
            sink,
            started: Instant::now(),
        };
        run.emit(EngineEvent::EngineStart {
            topic: input.topic.content().to_string(),
            persona_ids: input.personas.clone(),
            max_turns: input.params.max_turns,
            policy: input.params.policy,
        });
        run.emit(EngineEvent::PhaseStart {
            phase: DebatePhase::Opening,
            turn_index: 1,
        });
        run
    }

    pub(super) fn emit(&mut self, event: EngineEvent) -> Option<ApplyReport> {
        let report = self.ledger.apply(&event);
        self.sink.on_event(&event);
        report
    }

    pub(super) fn refresh_view(&mut self) {
        self.view = SemanticsView::compute(&self.ledger.graph.snapshot());
    }

    pub(super) fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub(super) fn output(&self) -> DebateEngineOutput {
        DebateEngineOutput::from_ledger(&self.ledger, self.elapsed_ms())
    }

    /// Emit the error event and hand back what the run produced so far.
    pub(super) fn fail(
        mut self,
        turn_index: usize,
        kind: EngineErrorKind,
        message: String,
    ) -> Box<DebateEngineOutput> {
        self.emit(EngineEvent::EngineError {
            turn_index,
            kind,
            message,
        });
        Box::new(self.output())
    }
}
