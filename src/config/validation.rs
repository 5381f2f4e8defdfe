//! Configuration validation
//!
//! Semantic checks that serde cannot express. Validation collects every
//! issue instead of stopping at the first one so a presenter can fix a file
//! in one pass.

use std::collections::HashSet;

use crate::config::schema::{
    InputConfig, LoadingConfig, PresentationConfig, PresentationMetadata, ShowcaseConfig, Timings,
};
use crate::error::{Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(&mut self, config: &PresentationConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_presentation(&config.presentation);
        self.validate_timings(&config.timings);
        self.validate_input(&config.input);
        self.validate_loading(&config.loading);
        self.validate_showcase(&config.showcase, &config.timings);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_presentation(&mut self, meta: &PresentationMetadata) {
        let url = meta.destination_url.trim();
        let scheme_ok = url.starts_with("https://") || url.starts_with("http://");
        if !scheme_ok {
            self.error(
                "presentation.destination_url",
                format!("'{url}' must be an absolute http(s) URL"),
            );
        } else if meta.destination_host().is_empty() {
            self.error("presentation.destination_url", "URL has no host");
        } else if url.starts_with("http://") {
            self.warning(
                "presentation.destination_url",
                "destination is not served over https",
            );
        }

        if meta.name.trim().is_empty() {
            self.warning("presentation.name", "brand name is empty");
        }
    }

    fn validate_timings(&mut self, timings: &Timings) {
        if timings.loading.is_zero() {
            self.warning(
                "timings.loading",
                "zero delay skips the loading screen entirely",
            );
        }
        if timings.showcase.is_zero() {
            self.warning(
                "timings.showcase",
                "zero delay skips the showcase entirely",
            );
        }
    }

    fn validate_input(&mut self, input: &InputConfig) {
        if input.proceed_keys.is_empty() {
            self.error(
                "input.proceed_keys",
                "at least one key is required to leave the welcome screen by keyboard",
            );
        }

        let mut seen = HashSet::new();
        for (idx, key) in input.proceed_keys.iter().enumerate() {
            let path = format!("input.proceed_keys[{idx}]");
            if key.as_str().trim().is_empty() {
                self.error(&path, "key code is empty");
            } else if !seen.insert(key.as_str()) {
                self.warning(&path, format!("duplicate key code '{key}'"));
            }
        }
    }

    fn validate_loading(&mut self, loading: &LoadingConfig) {
        if !(1..=100).contains(&loading.progress_step) {
            self.error(
                "loading.progress_step",
                format!(
                    "got {}, must be between 1 and 100",
                    loading.progress_step
                ),
            );
        }
        if loading.progress_interval.is_zero() {
            self.error("loading.progress_interval", "interval must be non-zero");
        }
    }

    fn validate_showcase(&mut self, showcase: &ShowcaseConfig, timings: &Timings) {
        let mut previous = None;
        for (idx, beat) in showcase.beats.iter().enumerate() {
            let path = format!("showcase.beats[{idx}]");
            if beat.text.trim().is_empty() {
                self.warning(&path, "beat has no text");
            }
            if beat.at >= timings.showcase {
                self.warning(
                    &path,
                    format!(
                        "beat at {} never shows; showcase ends after {}",
                        humantime::format_duration(beat.at),
                        humantime::format_duration(timings.showcase)
                    ),
                );
            }
            if previous.is_some_and(|p| beat.at < p) {
                self.warning(&path, "beats are not in chronological order");
            }
            previous = Some(beat.at);
        }
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
