//! JSONL event stream for presentation sessions.
//!
//! Every event carries a timestamp and is wrapped with a monotonically
//! increasing sequence number, so a consumer can replay a session in order
//! even when the stream is shared with other writers.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::sequencer::{Phase, SessionOutcome};

/// A discrete event emitted while a session runs.
///
/// Serialized with a `"type"` tag.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The session entered its first phase.
    SessionStarted {
        /// When the session started
        timestamp: DateTime<Utc>,
        /// Session identifier shared by every event of the session
        session_id: Uuid,
        /// Fixed navigation target
        destination_url: String,
    },

    /// A phase became active.
    PhaseEntered {
        /// When the phase was entered
        timestamp: DateTime<Utc>,
        /// Phase entered
        phase: Phase,
        /// Position along the presentation path
        phase_index: usize,
        /// Phase instance
        epoch: u64,
        /// Phase left, if any
        from: Option<Phase>,
        /// Human-readable cause
        trigger: String,
    },

    /// A phase armed its fixed delay.
    TimerArmed {
        /// When the timer was armed
        timestamp: DateTime<Utc>,
        /// Owning phase
        phase: Phase,
        /// Configured delay in milliseconds
        delay_ms: u64,
    },

    /// Pending timers were cancelled when a phase was left or torn down.
    TimersCancelled {
        /// When the scope was released
        timestamp: DateTime<Utc>,
        /// Phase that owned the timers
        phase: Phase,
        /// Number of timers that had not fired
        count: usize,
    },

    /// An input arrived but did not cause a transition.
    InputIgnored {
        /// When the input arrived
        timestamp: DateTime<Utc>,
        /// Phase active at the time
        phase: Phase,
        /// Input description
        input: String,
        /// Why it was ignored
        reason: String,
    },

    /// The navigator was asked to leave the presentation.
    NavigationIssued {
        /// When navigation was requested
        timestamp: DateTime<Utc>,
        /// Destination
        url: String,
        /// Whether the navigator reported success
        success: bool,
    },

    /// The session finished.
    SessionEnded {
        /// When the session ended
        timestamp: DateTime<Utc>,
        /// How it ended
        outcome: SessionOutcome,
        /// Wall-clock session length in milliseconds
        duration_ms: u64,
    },
}

#[derive(Debug, Serialize)]
struct EventEnvelope<'a> {
    sequence: u64,
    session_id: Uuid,
    #[serde(flatten)]
    event: &'a Event,
}

/// Thread-safe, buffered JSONL writer.
///
/// Write failures are dropped: the event stream must never interrupt a
/// running presentation.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
    session_id: Uuid,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("session_id", &self.session_id)
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to `writer` under a fresh session id.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
            session_id: Uuid::new_v4(),
        }
    }

    /// Creates an emitter that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates (or truncates) `path` and writes events to it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Session identifier stamped on every line.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Writes `event` as one JSON line and flushes.
    pub fn emit(&self, event: &Event) {
        let envelope = EventEnvelope {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
            session_id: self.session_id,
            event,
        };
        let Ok(line) = serde_json::to_string(&envelope) else {
            return;
        };
        if let Ok(mut w) = self.writer.lock() {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    #[derive(Clone, Default)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn lines(&self) -> Vec<serde_json::Value> {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf)
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn emitter_writes_tagged_jsonl_with_sequence() {
        let tw = TestWriter::default();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(&Event::PhaseEntered {
            timestamp: Utc::now(),
            phase: Phase::Welcome,
            phase_index: 1,
            epoch: 2,
            from: Some(Phase::Loading),
            trigger: "delay of 3s elapsed".to_owned(),
        });
        emitter.emit(&Event::TimerArmed {
            timestamp: Utc::now(),
            phase: Phase::Showcasing,
            delay_ms: 15_000,
        });

        assert_eq!(emitter.event_count(), 2);
        let lines = tw.lines();
        assert_eq!(lines[0]["type"], "PhaseEntered");
        assert_eq!(lines[0]["phase"], "welcome");
        assert_eq!(lines[0]["from"], "loading");
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[1]["type"], "TimerArmed");
        assert_eq!(lines[1]["delay_ms"], 15_000);
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(
            lines[1]["session_id"],
            emitter.session_id().to_string().as_str()
        );
    }

    #[test]
    fn session_ended_serializes_outcome() {
        let tw = TestWriter::default();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(&Event::SessionEnded {
            timestamp: Utc::now(),
            outcome: SessionOutcome::Navigated {
                url: "https://greenthicks.live".to_owned(),
            },
            duration_ms: 20_000,
        });

        let lines = tw.lines();
        assert_eq!(lines[0]["outcome"]["status"], "navigated");
        assert_eq!(lines[0]["outcome"]["url"], "https://greenthicks.live");
    }

    #[test]
    fn noop_emitter_counts_but_discards() {
        let emitter = EventEmitter::noop();
        emitter.emit(&Event::NavigationIssued {
            timestamp: Utc::now(),
            url: "https://example.com".to_owned(),
            success: false,
        });
        assert_eq!(emitter.event_count(), 1);
    }

    #[test]
    fn from_file_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let emitter = EventEmitter::from_file(&path).unwrap();
        emitter.emit(&Event::TimersCancelled {
            timestamp: Utc::now(),
            phase: Phase::Loading,
            count: 1,
        });
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(raw.trim()).unwrap();
        assert_eq!(parsed["type"], "TimersCancelled");
        assert_eq!(parsed["count"], 1);
    }
}
