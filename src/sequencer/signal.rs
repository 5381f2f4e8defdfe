//! Inputs the sequencer reacts to.
//!
//! Keys and pointer presses come from the input surface; proceed signals
//! come from mounted views and are tagged with the phase instance (epoch)
//! that mounted them so late signals can be recognised.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// DOM-style key code, e.g. `"Enter"` or `"Space"`.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(String);

impl KeyCode {
    /// Creates a key code from its name.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the key code name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// View able to emit a proceed signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProceedSource {
    /// "Begin" button on the loading screen
    LoadingView,
    /// Click or touch anywhere on the welcome screen
    WelcomeView,
}

impl ProceedSource {
    /// Stable name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadingView => "loading_view",
            Self::WelcomeView => "welcome_view",
        }
    }
}

/// A discrete input delivered to the sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Global keydown
    Key(KeyCode),
    /// Generic click or touch-start, routed to the mounted view
    Pointer,
    /// Proceed signal from a view
    Proceed {
        /// View that emitted the signal
        source: ProceedSource,
        /// Phase instance the view was mounted in
        epoch: u64,
    },
}

impl Input {
    /// Short label for metrics and events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Key(_) => "key",
            Self::Pointer => "pointer",
            Self::Proceed { .. } => "proceed",
        }
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(code) => write!(f, "key {code}"),
            Self::Pointer => f.write_str("pointer"),
            Self::Proceed { source, epoch } => {
                write!(f, "proceed from {} (epoch {epoch})", source.as_str())
            }
        }
    }
}

/// Cloneable sender for feeding inputs to a running sequencer.
#[derive(Debug, Clone)]
pub struct SequencerHandle {
    tx: mpsc::UnboundedSender<Input>,
}

impl SequencerHandle {
    pub(crate) const fn new(tx: mpsc::UnboundedSender<Input>) -> Self {
        Self { tx }
    }

    /// Delivers an input. Returns `false` once the sequencer is gone.
    pub fn send(&self, input: Input) -> bool {
        self.tx.send(input).is_ok()
    }

    /// Delivers a keydown for `code`.
    pub fn key(&self, code: &str) -> bool {
        self.send(Input::Key(KeyCode::new(code)))
    }

    /// Delivers a pointer press.
    pub fn pointer(&self) -> bool {
        self.send(Input::Pointer)
    }

    /// Whether the sequencer has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Callback handed to a mounted view so it can ask to proceed.
///
/// Signals from a view that has since been unmounted carry a stale epoch
/// and are ignored by the sequencer.
#[derive(Debug, Clone)]
pub struct ProceedSignal {
    source: ProceedSource,
    epoch: u64,
    tx: mpsc::UnboundedSender<Input>,
}

impl ProceedSignal {
    pub(crate) const fn new(
        source: ProceedSource,
        epoch: u64,
        tx: mpsc::UnboundedSender<Input>,
    ) -> Self {
        Self { source, epoch, tx }
    }

    /// Emits the proceed signal. Returns `false` once the sequencer is gone.
    pub fn emit(&self) -> bool {
        self.tx
            .send(Input::Proceed {
                source: self.source,
                epoch: self.epoch,
            })
            .is_ok()
    }

    /// View this signal belongs to.
    #[must_use]
    pub const fn source(&self) -> ProceedSource {
        self.source
    }

    /// Phase instance this signal was issued for.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }
}
