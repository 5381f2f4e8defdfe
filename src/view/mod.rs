//! Presentation views and the hosts that render them.
//!
//! The sequencer owns the lifecycle: it mounts exactly one view per phase
//! and unmounts it before the next phase registers anything. Hosts decide
//! how a view is drawn.

pub mod log;
pub mod progress;
pub mod terminal;

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::sequencer::{Phase, ProceedSignal};

pub use log::LogViews;
pub use progress::LoadingProgress;
pub use terminal::TerminalViews;

/// Text on the loading view's proceed button.
pub const BEGIN_LABEL: &str = "BEGIN GRAND LAUNCH";

/// Everything a view receives when it is mounted.
#[derive(Debug, Clone)]
pub struct MountContext {
    /// Phase the view is mounted for
    pub phase: Phase,
    /// Phase instance
    pub epoch: u64,
    /// Proceed callback for phases that accept one
    pub proceed: Option<ProceedSignal>,
}

/// Renders the view belonging to each phase.
///
/// Calls arrive from the sequencer's task, always in
/// mount → (pointer presses) → unmount order for a given phase.
pub trait ViewHost: Send {
    /// Shows the view for `ctx.phase`.
    fn mount(&mut self, ctx: MountContext);

    /// Removes the view for `phase` and releases anything it started.
    fn unmount(&mut self, phase: Phase);

    /// Delivers a click or touch-start to the view mounted for `phase`.
    fn pointer_down(&mut self, phase: Phase);
}

/// Line-oriented output shared between a host and the tasks it spawns.
#[derive(Clone)]
pub struct Screen {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Screen {
    /// Wraps a writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            out: Arc::new(Mutex::new(writer)),
        }
    }

    /// Writes one line. Output errors are dropped.
    pub fn line(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }

    /// Rewrites the current line in place.
    pub fn overwrite(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = write!(out, "\r{text}");
            let _ = out.flush();
        }
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen").finish_non_exhaustive()
    }
}
