//! Prometheus metrics for presentation sessions.
//!
//! All label values come from fixed enums, so there is no cardinality to
//! guard against.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::LaunchError;
use crate::sequencer::Phase;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs the global recorder.
///
/// With `port`, a Prometheus listener is bound on `127.0.0.1:<port>`.
/// Later calls are no-ops.
///
/// # Errors
///
/// Returns `LaunchError::Io` if the recorder or listener cannot be
/// installed.
pub fn init_metrics(port: Option<u16>) -> Result<(), LaunchError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| LaunchError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    describe_counter!(
        "launchseq_phase_transitions_total",
        "Phase transitions by source, target and trigger"
    );
    describe_gauge!("launchseq_current_phase", "Active phase (1 = active)");
    describe_counter!("launchseq_inputs_total", "Inputs received by kind and outcome");
    describe_counter!("launchseq_timers_armed_total", "Phase timers armed");
    describe_counter!(
        "launchseq_timers_cancelled_total",
        "Phase timers cancelled before firing"
    );
    describe_counter!("launchseq_redirects_total", "Navigations issued by result");
    describe_histogram!(
        "launchseq_session_duration_seconds",
        "Session length from start to navigation or teardown"
    );
}

/// Records a transition. `from` is `None` for the session's first entry.
pub fn record_phase_transition(from: Option<Phase>, to: Phase, trigger: &'static str) {
    counter!(
        "launchseq_phase_transitions_total",
        "from" => from.map_or("none", Phase::as_str),
        "to" => to.as_str(),
        "trigger" => trigger,
    )
    .increment(1);
}

/// Sets the active-phase gauge, clearing the previous phase's label.
pub fn set_current_phase(phase: Phase, previous: Option<Phase>) {
    if let Some(prev) = previous {
        gauge!("launchseq_current_phase", "phase" => prev.as_str()).set(0.0);
    }
    gauge!("launchseq_current_phase", "phase" => phase.as_str()).set(1.0);
}

/// Clears the active-phase gauge when a session ends.
pub fn clear_current_phase(phase: Phase) {
    gauge!("launchseq_current_phase", "phase" => phase.as_str()).set(0.0);
}

/// Records an input and whether it caused a transition.
pub fn record_input(kind: &'static str, accepted: bool) {
    let outcome = if accepted { "accepted" } else { "ignored" };
    counter!("launchseq_inputs_total", "kind" => kind, "outcome" => outcome).increment(1);
}

/// Records a timer armed on phase entry.
pub fn record_timer_armed(phase: Phase) {
    counter!("launchseq_timers_armed_total", "phase" => phase.as_str()).increment(1);
}

/// Records timers cancelled when their phase was left early.
pub fn record_timers_cancelled(phase: Phase, count: usize) {
    if count == 0 {
        return;
    }
    counter!("launchseq_timers_cancelled_total", "phase" => phase.as_str())
        .increment(u64::try_from(count).unwrap_or(u64::MAX));
}

/// Records a navigation attempt.
pub fn record_redirect(success: bool) {
    let result = if success { "ok" } else { "failed" };
    counter!("launchseq_redirects_total", "result" => result).increment(1);
}

/// Records how long a session ran.
pub fn record_session_duration(duration: Duration) {
    histogram!("launchseq_session_duration_seconds").record(duration.as_secs_f64());
}
