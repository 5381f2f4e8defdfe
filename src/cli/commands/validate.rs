//! `validate`: check presentation files without running them.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::ConfigLoader;
use crate::error::{ConfigError, LaunchError, Severity, ValidationIssue};

/// Outcome for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl FileReport {
    fn check(loader: &ConfigLoader, path: &Path, strict: bool) -> Self {
        match loader.load(path) {
            Ok(result) => {
                let warnings: Vec<String> = result
                    .warnings
                    .iter()
                    .map(|w| match &w.location {
                        Some(location) => format!("{} at {location}", w.message),
                        None => w.message.clone(),
                    })
                    .collect();
                Self {
                    file: path.to_path_buf(),
                    valid: !(strict && !warnings.is_empty()),
                    errors: Vec::new(),
                    warnings,
                }
            }
            Err(ConfigError::ValidationError { errors, .. }) => Self {
                file: path.to_path_buf(),
                valid: false,
                errors: errors.iter().map(ToString::to_string).collect(),
                warnings: Vec::new(),
            },
            Err(e) => Self {
                file: path.to_path_buf(),
                valid: false,
                errors: vec![e.to_string()],
                warnings: Vec::new(),
            },
        }
    }
}

/// Validates every file and prints a report.
///
/// # Errors
///
/// Returns a configuration error naming the failed files if any file is
/// invalid. With `--strict`, warnings count as failures.
pub fn run(args: &ValidateArgs) -> Result<(), LaunchError> {
    let loader = ConfigLoader::default();
    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| {
            tracing::info!(file = %path.display(), "validating configuration");
            FileReport::check(&loader, path, args.strict)
        })
        .collect();

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    let failed: Vec<ValidationIssue> = reports
        .iter()
        .filter(|r| !r.valid)
        .map(|r| ValidationIssue {
            path: r.file.display().to_string(),
            message: if r.errors.is_empty() {
                "warnings reported in strict mode".to_owned()
            } else {
                format!("{} error(s)", r.errors.len())
            },
            severity: Severity::Error,
        })
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            path: format!("{} of {} file(s)", failed.len(), reports.len()),
            errors: failed,
        }
        .into())
    }
}

fn print_human(report: &FileReport) {
    let status = if report.valid { "ok" } else { "FAILED" };
    println!("{}: {status}", report.file.display());
    for error in &report.errors {
        println!("  {error}");
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
}
