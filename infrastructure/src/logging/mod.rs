//! Logging infrastructure: the structured engine event log.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer that implements the
//! [`EngineEventSink`](dialectic_application::EngineEventSink) port, and
//! [`read_events`] to load a log for replay.

mod jsonl_event_log;

pub use jsonl_event_log::{EventLogError, JsonlEventLog, read_events};
