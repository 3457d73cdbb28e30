//! Logging setup.
//!
//! One global `tracing` subscriber per process, filtered by `RUST_LOG`, the
//! configured level, or `-v`. The TUI never logs to the terminal it draws on.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::AppError;

/// Where log lines go for the current front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Line-oriented commands: stderr, unless a log file is configured.
    Stderr,
    /// The TUI owns the terminal: configured log file only, otherwise nothing.
    FileOnly,
}

fn build_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "prophet_valuer=debug,info".to_string()
    } else {
        format!("prophet_valuer={},warn", config.level)
    };
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("prophet_valuer=info"))
}

pub fn init_logger(config: &LoggingConfig, target: LogTarget, verbose: bool) -> Result<(), AppError> {
    let filter = build_filter(config, verbose);

    match (&config.file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::usage(format!("Failed to open log file '{}': {e}", path.display())))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .try_init()
                .unwrap_or_else(already_installed);
        }
        (None, LogTarget::Stderr) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .try_init()
                .unwrap_or_else(already_installed);
        }
        (None, LogTarget::FileOnly) => {}
    }

    Ok(())
}

/// A subscriber is already installed (tests, or a second `init_logger` call).
/// The first one stays in charge.
fn already_installed(err: tracing_subscriber::util::TryInitError) {
    tracing::debug!(error = %err, "logger already initialized; keeping the existing subscriber");
}
