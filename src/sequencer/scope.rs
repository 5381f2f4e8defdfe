//! Resources owned by one phase instance.
//!
//! A [`PhaseScope`] holds the timers armed on phase entry and the keydown
//! listener (Welcome only). Releasing the scope, or dropping it, cancels
//! every timer before the next phase registers anything.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

use super::phase::Phase;
use super::signal::KeyCode;

/// Message sent by a timer task when its delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    /// Phase the timer was armed for
    pub phase: Phase,
    /// Phase instance the timer was armed for
    pub epoch: u64,
    /// Configured delay
    pub delay: Duration,
}

/// Keydown subscription scoped to the phase that acquired it.
#[derive(Debug)]
pub struct KeyListener {
    keys: Vec<KeyCode>,
}

impl KeyListener {
    fn attach(keys: &[KeyCode]) -> Self {
        debug!(keys = ?keys, "keydown listener attached");
        Self {
            keys: keys.to_vec(),
        }
    }

    /// Whether `code` is one of the designated keys.
    #[must_use]
    pub fn matches(&self, code: &KeyCode) -> bool {
        self.keys.contains(code)
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        debug!("keydown listener released");
    }
}

/// Timers and listeners registered by one phase instance.
pub struct PhaseScope {
    phase: Phase,
    epoch: u64,
    token: CancellationToken,
    timers: Vec<JoinHandle<()>>,
    key_listener: Option<KeyListener>,
    _cancel_on_drop: DropGuard,
}

impl PhaseScope {
    /// Opens an empty scope for the given phase instance.
    #[must_use]
    pub fn open(phase: Phase, epoch: u64) -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            phase,
            epoch,
            token,
            timers: Vec::new(),
            key_listener: None,
            _cancel_on_drop: guard,
        }
    }

    /// Arms a timer that reports a [`Deadline`] at `deadline`, unless the
    /// scope is released first.
    pub fn arm(&mut self, deadline: Instant, delay: Duration, tx: mpsc::UnboundedSender<Deadline>) {
        let token = self.token.clone();
        let message = Deadline {
            phase: self.phase,
            epoch: self.epoch,
            delay,
        };
        trace!(phase = %self.phase, epoch = self.epoch, ?delay, "arming phase timer");
        self.timers.push(tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep_until(deadline) => {
                    let _ = tx.send(message);
                }
            }
        }));
    }

    /// Attaches the keydown listener for this phase.
    pub fn listen_for_keys(&mut self, keys: &[KeyCode]) {
        if self.key_listener.is_none() {
            self.key_listener = Some(KeyListener::attach(keys));
        }
    }

    /// Returns the keydown listener, if this scope holds one.
    #[must_use]
    pub const fn key_listener(&self) -> Option<&KeyListener> {
        self.key_listener.as_ref()
    }

    /// Number of timers that have not fired or been cancelled yet.
    #[must_use]
    pub fn armed_timers(&self) -> usize {
        if self.token.is_cancelled() {
            return 0;
        }
        self.timers.iter().filter(|t| !t.is_finished()).count()
    }

    /// Phase this scope belongs to.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Cancels every timer and releases the key listener.
    ///
    /// Returns how many timers were still pending.
    pub fn release(mut self) -> usize {
        let pending = self.armed_timers();
        self.token.cancel();
        self.key_listener = None;
        pending
    }
}

impl std::fmt::Debug for PhaseScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseScope")
            .field("phase", &self.phase)
            .field("epoch", &self.epoch)
            .field("armed_timers", &self.armed_timers())
            .field("listening", &self.key_listener.is_some())
            .finish_non_exhaustive()
    }
}
