//! Sequencer state and transition records.

use std::time::Duration;

use tokio::time::Instant;

use super::phase::Phase;
use super::signal::{KeyCode, ProceedSource};

/// Why a transition fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The session started and entered its first phase
    SessionStart,
    /// The phase's fixed delay elapsed
    DelayElapsed(Duration),
    /// A view emitted its proceed signal
    Proceed(ProceedSource),
    /// A designated key was pressed
    Key(KeyCode),
}

impl Trigger {
    /// Short label for metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SessionStart => "start",
            Self::DelayElapsed(_) => "delay",
            Self::Proceed(_) => "proceed",
            Self::Key(_) => "key",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionStart => f.write_str("session started"),
            Self::DelayElapsed(delay) => {
                write!(f, "delay of {} elapsed", humantime::format_duration(*delay))
            }
            Self::Proceed(source) => write!(f, "proceed from {}", source.as_str()),
            Self::Key(code) => write!(f, "key {code} pressed"),
        }
    }
}

/// Record of a phase transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    /// Phase left, `None` for the session's first entry
    pub from: Option<Phase>,
    /// Phase entered
    pub to: Phase,
    /// What caused the transition
    pub trigger: Trigger,
    /// Epoch of the phase instance that was entered
    pub epoch: u64,
}

/// Current phase of one presentation session.
///
/// `epoch` counts phase entries; it is `0` until the session starts and
/// identifies the active phase instance afterwards.
#[derive(Debug)]
pub struct SequencerState {
    phase: Phase,
    phase_entered_at: Instant,
    epoch: u64,
    completed: bool,
}

impl SequencerState {
    /// Creates a state positioned at `Loading`, not yet started.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            phase_entered_at: Instant::now(),
            epoch: 0,
            completed: false,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the epoch of the active phase instance.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns when the current phase was entered.
    #[must_use]
    pub const fn phase_entered_at(&self) -> Instant {
        self.phase_entered_at
    }

    /// Whether the session has entered its first phase.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.epoch > 0
    }

    /// Whether the session has navigated away or been torn down.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Enters the initial phase. Returns `false` if already started.
    pub fn begin(&mut self) -> bool {
        if self.is_started() || self.completed {
            return false;
        }
        self.epoch = 1;
        self.phase_entered_at = Instant::now();
        true
    }

    /// Advances from `from` to `to`.
    ///
    /// Succeeds only when `from` is the current phase, `to` directly
    /// follows it, and the session is still live. Returns `true` on success.
    pub fn try_advance(&mut self, from: Phase, to: Phase) -> bool {
        if !self.is_started() || self.completed || self.phase != from || from.next() != Some(to) {
            return false;
        }
        self.phase = to;
        self.epoch += 1;
        self.phase_entered_at = Instant::now();
        true
    }

    /// Marks the session as finished. No further transitions are accepted.
    pub fn complete(&mut self) {
        self.completed = true;
    }
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::new()
    }
}
