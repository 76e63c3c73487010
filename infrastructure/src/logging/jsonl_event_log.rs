//! JSONL file writer and reader for engine events.
//!
//! Each [`EngineEvent`] is serialized as a single JSON line carrying its
//! `type` tag plus a wall-clock `timestamp`, appended via a buffered writer.
//! [`read_events`] parses such a file back for replay.

use dialectic_application::EngineEventSink;
use dialectic_domain::EngineEvent;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("Cannot read event log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid event on line {line}: {message}")]
    InvalidLine { line: usize, message: String },
}

/// JSONL event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Create a new log writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EngineEventSink for JsonlEventLog {
    fn on_event(&self, event: &EngineEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match serde_json::to_value(event) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("Could not serialize {} event", event.kind());
                return;
            }
        };
        record.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // A crashed run still leaves a replayable prefix
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Read an event log back, in order. Blank lines are skipped; the extra
/// `timestamp` field is ignored.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<EngineEvent>, EventLogError> {
    let path = path.as_ref();
    let io_error = |source| EventLogError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;

    let mut events = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|e| EventLogError::InvalidLine {
            line: index + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_domain::{
        DebateLedger, DebatePhase, DebatePolicy, DialogueTurn, Move, TokenUsage,
    };
    use std::io::Read;

    fn sample_events() -> Vec<EngineEvent> {
        vec![
            EngineEvent::EngineStart {
                topic: "Should cities ban private cars?".to_string(),
                persona_ids: vec!["x".into(), "y".into()],
                max_turns: 6,
                policy: DebatePolicy::default(),
            },
            EngineEvent::PhaseStart {
                phase: DebatePhase::Opening,
                turn_index: 1,
            },
            EngineEvent::DialogueTurn {
                turn: DialogueTurn::new(
                    1,
                    DebatePhase::Opening,
                    "x",
                    "Cars choke our streets.",
                    Move::Claim,
                    "2026-01-01T00:00:00Z",
                ),
                token_usage: TokenUsage::new(12, 30),
            },
        ]
    }

    #[test]
    fn test_event_log_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();

        for event in sample_events() {
            log.on_event(&event);
        }
        drop(log);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 3);
        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("type").is_some());
            assert!(value.get("timestamp").is_some());
        }

        let third: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(third["type"], "dialogue_turn");
        assert_eq!(third["turn"]["move"], "CLAIM");
        assert_eq!(third["turn"]["persona_id"], "x");
    }

    #[test]
    fn test_read_back_replays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("run.events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();
        for event in sample_events() {
            log.on_event(&event);
        }
        drop(log);

        let events = read_events(&path).unwrap();
        assert_eq!(events, sample_events());

        let ledger = DebateLedger::replay(&events);
        assert_eq!(ledger.transcript.len(), 1);
        assert_eq!(ledger.token_usage.total(), 42);
    }

    #[test]
    fn test_read_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jsonl");
        std::fs::write(&path, "{\"type\":\"phase_start\",\"phase\":\"opening\",\"turn_index\":1}\n\nnot json\n").unwrap();

        match read_events(&path) {
            Err(EventLogError::InvalidLine { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_events(dir.path().join("absent.jsonl"));
        assert!(matches!(result, Err(EventLogError::Io { .. })));
    }
}
