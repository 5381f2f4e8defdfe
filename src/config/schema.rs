//! Configuration schema types
//!
//! Typed form of a presentation file. Every section is optional and falls
//! back to the launch defaults, so an empty mapping describes the stock
//! Greenthicks presentation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sequencer::KeyCode;

/// Destination used when no configuration overrides it.
pub const DEFAULT_DESTINATION_URL: &str = "https://greenthicks.live";

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a presentation session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationConfig {
    /// Branding and hand-off target
    pub presentation: PresentationMetadata,

    /// Per-phase delays
    pub timings: Timings,

    /// Input surface settings
    pub input: InputConfig,

    /// Loading view progress settings
    pub loading: LoadingConfig,

    /// Showcase view script
    pub showcase: ShowcaseConfig,
}

// ============================================================================
// Presentation Metadata
// ============================================================================

/// Brand copy and the external destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationMetadata {
    /// Brand name shown on the loading and welcome screens
    pub name: String,

    /// Tagline shown under the brand name
    pub tagline: String,

    /// Where the session hands off once the presentation ends
    pub destination_url: String,
}

impl Default for PresentationMetadata {
    fn default() -> Self {
        Self {
            name: "GREENTHICKS".to_string(),
            tagline: "FRESH FROM FARM TO TABLE".to_string(),
            destination_url: DEFAULT_DESTINATION_URL.to_string(),
        }
    }
}

impl PresentationMetadata {
    /// Returns the host portion of the destination URL, or the whole URL
    /// when it cannot be split.
    #[must_use]
    pub fn destination_host(&self) -> &str {
        let url = self.destination_url.as_str();
        let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
        rest.split(['/', '?', '#']).next().unwrap_or(rest)
    }
}

// ============================================================================
// Timings
// ============================================================================

/// Fixed delays driving the timed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timings {
    /// Loading → Welcome when no proceed signal arrives first
    #[serde(with = "humantime_duration")]
    pub loading: Duration,

    /// Showcasing → Redirecting
    #[serde(with = "humantime_duration")]
    pub showcase: Duration,

    /// Redirecting → navigation
    #[serde(with = "humantime_duration")]
    pub redirect: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            loading: Duration::from_millis(3000),
            showcase: Duration::from_millis(15_000),
            redirect: Duration::from_millis(2000),
        }
    }
}

// ============================================================================
// Input
// ============================================================================

/// Input surface configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Key codes that advance the welcome screen
    pub proceed_keys: Vec<KeyCode>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            proceed_keys: vec![KeyCode::new("Space"), KeyCode::new("Enter")],
        }
    }
}

// ============================================================================
// Loading View
// ============================================================================

/// Loading progress bar settings.
///
/// The proceed button on the loading view only appears once progress
/// reaches 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadingConfig {
    /// Percentage points added per tick
    pub progress_step: u8,

    /// Time between ticks
    #[serde(with = "humantime_duration")]
    pub progress_interval: Duration,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            progress_step: 2,
            progress_interval: Duration::from_millis(60),
        }
    }
}

// ============================================================================
// Showcase View
// ============================================================================

/// Timed text reveals played by the showcase view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowcaseConfig {
    /// Beats in reveal order
    pub beats: Vec<ShowcaseBeat>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            beats: vec![
                ShowcaseBeat::new(Duration::from_secs(1), "Greenthicks now live on"),
                ShowcaseBeat::new(Duration::from_secs(2), "greenthicks.live"),
                ShowcaseBeat::new(Duration::from_secs(3), "open and order now"),
            ],
        }
    }
}

/// A single line of showcase text revealed at an offset from mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShowcaseBeat {
    /// Offset from the showcase view mounting
    #[serde(with = "humantime_duration")]
    pub at: Duration,

    /// Text to reveal
    pub text: String,
}

impl ShowcaseBeat {
    /// Creates a beat revealing `text` at `at`.
    #[must_use]
    pub fn new(at: Duration, text: impl Into<String>) -> Self {
        Self {
            at,
            text: text.into(),
        }
    }
}

// ============================================================================
// Duration (de)serialization
// ============================================================================

/// Serde adapter for `humantime` duration strings (`60ms`, `3s`, `1m 30s`).
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
