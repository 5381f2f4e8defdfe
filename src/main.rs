//! `launchseq` - timed full-screen launch presentation

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use clap::Parser;
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;

use launchseq::cli::args::{Cli, LogFormatArg};
use launchseq::cli::commands;
use launchseq::error::ExitCode;
use launchseq::observability::{LogFormat, init_logging};

/// Waits for SIGINT or SIGTERM and returns the matching exit code.
async fn next_signal() -> i32 {
    let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
        tracing::warn!("failed to register SIGTERM handler");
        let _ = tokio::signal::ctrl_c().await;
        return ExitCode::INTERRUPTED;
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => ExitCode::INTERRUPTED,
        _ = sigterm.recv() => ExitCode::TERMINATED,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        let format = match cli.log_format {
            LogFormatArg::Human => LogFormat::Human,
            LogFormatArg::Json => LogFormat::Json,
        };
        init_logging(format, cli.verbose, cli.color);
    }

    let shutdown = CancellationToken::new();
    let interrupted = Arc::new(AtomicI32::new(ExitCode::SUCCESS));
    {
        let shutdown = shutdown.clone();
        let interrupted = Arc::clone(&interrupted);
        tokio::spawn(async move {
            let code = next_signal().await;
            interrupted.store(code, Ordering::SeqCst);
            eprintln!("\nStopping presentation... (press Ctrl+C again to force)");
            shutdown.cancel();

            let code = next_signal().await;
            std::process::exit(code);
        });
    }

    let result = commands::dispatch(cli, shutdown).await;

    match result {
        Ok(()) => {
            let code = interrupted.load(Ordering::SeqCst);
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
