//! Port for observing engine events.
//!
//! Separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, while this port delivers the structured
//! event stream that a consumer can replay into full run state.

use dialectic_domain::EngineEvent;

/// Receives every engine event in order.
///
/// `on_event` is synchronous and non-fallible so observers never disturb
/// the run; sinks swallow their own I/O errors.
pub trait EngineEventSink: Send + Sync {
    fn on_event(&self, event: &EngineEvent);
}

/// No-op sink for tests and when nobody listens
pub struct NoEvents;

impl EngineEventSink for NoEvents {
    fn on_event(&self, _event: &EngineEvent) {}
}

/// Fans each event out to several sinks, in order.
///
/// ```text
/// RunDebateUseCase.execute_with_events(input, &composite)
///                                           |
///                  +------------------------+----------------------+
///                  |                                               |
///          ProgressReporter                                 JsonlEventLog
///          (terminal progress)                              (replayable file)
/// ```
pub struct CompositeSink<'a> {
    delegates: Vec<&'a dyn EngineEventSink>,
}

impl<'a> CompositeSink<'a> {
    pub fn new(delegates: Vec<&'a dyn EngineEventSink>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, sink: &'a dyn EngineEventSink) {
        self.delegates.push(sink);
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl EngineEventSink for CompositeSink<'_> {
    fn on_event(&self, event: &EngineEvent) {
        for sink in &self.delegates {
            sink.on_event(event);
        }
    }
}

/// Collects events in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EngineEventSink for RecordingSink {
    fn on_event(&self, event: &EngineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_domain::DebatePhase;

    #[test]
    fn test_composite_delivers_to_all() {
        let a = RecordingSink::new();
        let b = RecordingSink::new();
        let composite = CompositeSink::new(vec![&a, &b, &NoEvents]);
        composite.on_event(&EngineEvent::PhaseStart {
            phase: DebatePhase::Opening,
            turn_index: 1,
        });
        assert_eq!(a.events().len(), 1);
        assert_eq!(b.events().len(), 1);
        assert_eq!(composite.len(), 3);
    }
}
