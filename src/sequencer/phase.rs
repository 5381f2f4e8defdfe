//! Presentation phases and the fixed transition path between them.

use std::time::Duration;

use serde::Serialize;

use crate::config::schema::Timings;

use super::signal::ProceedSource;

/// A mutually exclusive stage of the presentation.
///
/// The only path is `Loading → Welcome → Showcasing → Redirecting`, after
/// which the session leaves through the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Progress indicator while the presentation warms up
    Loading,
    /// Call to action waiting for the presenter
    Welcome,
    /// Fixed-length showcase sequence
    Showcasing,
    /// Overlay shown right before navigation
    Redirecting,
}

impl Phase {
    /// All phases in presentation order.
    pub const ALL: [Self; 4] = [
        Self::Loading,
        Self::Welcome,
        Self::Showcasing,
        Self::Redirecting,
    ];

    /// Returns the phase that follows this one, or `None` for the last phase.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Loading => Some(Self::Welcome),
            Self::Welcome => Some(Self::Showcasing),
            Self::Showcasing => Some(Self::Redirecting),
            Self::Redirecting => None,
        }
    }

    /// Returns the fixed delay armed on entry, if the phase has one.
    ///
    /// `Welcome` waits for the presenter and has no timer.
    #[must_use]
    pub const fn delay(self, timings: &Timings) -> Option<Duration> {
        match self {
            Self::Loading => Some(timings.loading),
            Self::Welcome => None,
            Self::Showcasing => Some(timings.showcase),
            Self::Redirecting => Some(timings.redirect),
        }
    }

    /// Returns the view allowed to emit a proceed signal in this phase.
    #[must_use]
    pub const fn proceed_source(self) -> Option<ProceedSource> {
        match self {
            Self::Loading => Some(ProceedSource::LoadingView),
            Self::Welcome => Some(ProceedSource::WelcomeView),
            Self::Showcasing | Self::Redirecting => None,
        }
    }

    /// Whether the keydown listener is attached while this phase is active.
    #[must_use]
    pub const fn listens_for_keys(self) -> bool {
        matches!(self, Self::Welcome)
    }

    /// Zero-based position along the presentation path.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase name used in logs, events and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Welcome => "welcome",
            Self::Showcasing => "showcasing",
            Self::Redirecting => "redirecting",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
