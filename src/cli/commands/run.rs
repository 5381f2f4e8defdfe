//! `run`: present one session and hand off to the destination.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::args::{NavigatorKind, RunArgs, ViewKind};
use crate::config::{PresentationConfig, Validator};
use crate::error::{ConfigError, LaunchError};
use crate::input;
use crate::navigator::{BrowserNavigator, Navigator, StdoutNavigator};
use crate::observability::{EventEmitter, init_metrics};
use crate::sequencer::{Sequencer, SessionOutcome};
use crate::view::{LogViews, TerminalViews, ViewHost};

/// Runs a presentation until it navigates away or `shutdown` fires.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the events file cannot
/// be created, or the metrics listener cannot bind.
pub async fn run(args: &RunArgs, shutdown: CancellationToken) -> Result<SessionOutcome, LaunchError> {
    if let Some(port) = args.metrics_port {
        init_metrics(Some(port))?;
        info!(port, "Prometheus metrics endpoint started");
    }

    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(url) = &args.destination {
        config = with_destination(&config, url)?;
    }

    let events = match &args.events_file {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    };

    let views: Box<dyn ViewHost> = match args.view {
        ViewKind::Terminal => Box::new(TerminalViews::stdout(Arc::clone(&config))),
        ViewKind::Log => Box::new(LogViews::new(Arc::clone(&config))),
    };
    let navigator: Arc<dyn Navigator> = match args.navigator {
        NavigatorKind::Browser => Arc::new(BrowserNavigator),
        NavigatorKind::Stdout => Arc::new(StdoutNavigator::default()),
    };

    let mut sequencer = Sequencer::new(config, views, navigator, Arc::new(events));
    let input_cancel = shutdown.child_token();
    let _reader = input::spawn_stdin_reader(sequencer.handle(), input_cancel.clone());

    let outcome = sequencer.run(shutdown).await;
    input_cancel.cancel();
    info!(%outcome, "session finished");
    Ok(outcome)
}

/// Replaces the destination and re-validates the result.
fn with_destination(
    config: &PresentationConfig,
    url: &str,
) -> Result<Arc<PresentationConfig>, LaunchError> {
    let mut config = config.clone();
    config.presentation.destination_url = url.to_owned();
    let result = Validator::new().validate(&config);
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: "--destination".to_owned(),
            errors: result.errors,
        }
        .into());
    }
    Ok(Arc::new(config))
}
