//! CLI command dispatch and handlers.

pub mod completions;
pub mod print_config;
pub mod run;
pub mod validate;
pub mod version;

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigLoader, PresentationConfig};
use crate::error::LaunchError;

/// Dispatches a parsed invocation to its handler.
///
/// `shutdown` is cancelled when the process receives SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns the handler's error.
pub async fn dispatch(cli: Cli, shutdown: CancellationToken) -> Result<(), LaunchError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, shutdown).await.map(|_| ()),
        Commands::Validate(args) => validate::run(&args),
        Commands::PrintConfig(args) => print_config::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => version::run(&args),
    }
}

/// Loads `path`, or the built-in presentation when no path is given.
///
/// Loader warnings are logged.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Arc<PresentationConfig>, LaunchError> {
    let Some(path) = path else {
        tracing::debug!("no configuration file, using built-in presentation");
        return Ok(Arc::new(PresentationConfig::default()));
    };
    tracing::info!(config = %path.display(), "loading configuration");
    let result = ConfigLoader::default().load(path)?;
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    Ok(result.config)
}
