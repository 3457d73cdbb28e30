//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads configuration and sets up logging
//! - values the property
//! - optionally requests the market analysis
//! - prints reports

use std::io::{self, Write};

use chrono::Datelike;
use clap::Parser;
use tracing::info;

use crate::cli::{Command, EstimateArgs};
use crate::config::{AppConfig, NarrativeConfig};
use crate::error::AppError;
use crate::logging::{LogTarget, init_logger};
use crate::market::MARKET_TRENDS;
use crate::narrative::GeminiClient;
use crate::report::{EstimateReport, format_breakdown, format_locations, format_trends, format_valuation};
use crate::valuation::LOCATIONS;

pub mod pipeline;
pub mod session;

/// Entry point for the `prophet` binary.
pub fn run() -> Result<(), AppError> {
    // We want `prophet` and `prophet --sqft 3000` to behave like `prophet tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Estimate(args) => {
            init_logger(&config.logging, LogTarget::Stderr, cli.verbose)?;
            handle_estimate(args, &config)
        }
        Command::Tui(args) => {
            init_logger(&config.logging, LogTarget::FileOnly, cli.verbose)?;
            crate::tui::run(args, &config)
        }
        Command::Zips => {
            print!("{}", format_locations(LOCATIONS.entries()));
            Ok(())
        }
    }
}

/// The current calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn handle_estimate(args: EstimateArgs, config: &AppConfig) -> Result<(), AppError> {
    if args.explain {
        dotenvy::dotenv().ok();
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_estimate(&args, config, |name| std::env::var(name).ok(), &mut out)
}

/// `None` unless `--explain` was given. A missing key fails here, before any
/// valuation runs.
fn resolve_narrator<F>(args: &EstimateArgs, config: &NarrativeConfig, lookup: F) -> Result<Option<GeminiClient>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if !args.explain {
        return Ok(None);
    }
    Ok(Some(GeminiClient::from_lookup(config, lookup)?))
}

fn write_estimate<F, W>(args: &EstimateArgs, config: &AppConfig, lookup: F, out: &mut W) -> Result<(), AppError>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let narrator = resolve_narrator(args, &config.narrative, lookup)?;

    let features = if args.interactive {
        crate::cli::form::prompt_for_features(args.features.to_features())?
    } else {
        args.features.to_features()
    };
    let as_of_year = args.as_of_year.unwrap_or_else(current_year);

    let valuation = pipeline::run_valuation(&features, as_of_year)?;

    // Print the price before the (slow, fallible) narrative request.
    if !args.json {
        writeln!(out, "{}", format_valuation(&features, &valuation, as_of_year)).map_err(write_err)?;
        if args.breakdown {
            writeln!(out, "{}", format_breakdown(&valuation.breakdown)).map_err(write_err)?;
        }
        if args.trends {
            writeln!(out, "{}", format_trends(&MARKET_TRENDS)).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;
    }

    let narrative = narrator.as_ref().map(|client| {
        info!(model = client.model(), "generating AI analysis");
        pipeline::run_narrative(client, &valuation, &features)
    });

    if args.json {
        let report = EstimateReport {
            as_of_year,
            features: &features,
            valuation: &valuation,
            narrative: narrative.as_ref().and_then(|n| n.as_ref().ok()).map(String::as_str),
            narrative_error: narrative.as_ref().and_then(|n| n.as_ref().err()).map(|e| e.to_string()),
        };
        writeln!(out, "{}", report.to_json()?).map_err(write_err)?;
    } else if let Some(Ok(text)) = &narrative {
        writeln!(out, "AI market analysis:\n").map_err(write_err)?;
        writeln!(out, "{}", text.trim_end()).map_err(write_err)?;
    }

    match narrative {
        Some(Err(err)) => Err(err.into()),
        _ => Ok(()),
    }
}

fn write_err(e: io::Error) -> AppError {
    AppError::runtime(format!("Failed to write output: {e}"))
}

/// Rewrite argv so `prophet` defaults to `prophet tui`.
///
/// Rules:
/// - `prophet`                          -> `prophet tui`
/// - `prophet --sqft 3000 ...`          -> `prophet tui --sqft 3000 ...`
/// - `prophet --help/--version/-h`      -> unchanged (show top-level help/version)
/// - any argv naming a subcommand       -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let names_subcommand = argv
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "estimate" | "tui" | "zips"));
    if names_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_tui() {
        assert_eq!(rewrite_args(argv(&["prophet"])), argv(&["prophet", "tui"]));
    }

    #[test]
    fn leading_flags_are_tui_flags() {
        assert_eq!(
            rewrite_args(argv(&["prophet", "--sqft", "3000"])),
            argv(&["prophet", "tui", "--sqft", "3000"])
        );
    }

    #[test]
    fn global_flag_before_subcommand_is_left_alone() {
        let args = argv(&["prophet", "--config", "alt.toml", "estimate"]);
        assert_eq!(rewrite_args(args.clone()), args);
    }

    #[test]
    fn help_and_subcommands_are_unchanged() {
        for args in [
            argv(&["prophet", "--help"]),
            argv(&["prophet", "estimate", "--json"]),
            argv(&["prophet", "zips"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    fn estimate_args(args: &[&str]) -> EstimateArgs {
        let cli = crate::cli::Cli::parse_from(args);
        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        args
    }

    fn no_key(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_key_fails_before_anything_is_valued_or_printed() {
        // Invalid grade: if valuation ran first this would be a validation error.
        let args = estimate_args(&["prophet", "estimate", "--explain", "--grade", "0"]);
        let mut out = Vec::new();

        let err = write_estimate(&args, &AppConfig::default(), no_key, &mut out).unwrap_err();

        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
        assert!(err.to_string().starts_with("missing API key: set GOOGLE_API_KEY"), "got {err}");
        assert!(out.is_empty());
    }

    #[test]
    fn no_key_needed_without_explain() {
        let args = estimate_args(&["prophet", "estimate", "--as-of-year", "2024"]);
        let mut out = Vec::new();

        write_estimate(&args, &AppConfig::default(), no_key, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Estimated price: $1,663,200"));
        assert!(text.contains("Range: $1,530,144 - $1,796,256"));
        assert!(!text.contains("AI market analysis"));
    }

    #[test]
    fn narrative_failure_exits_after_the_price_is_printed() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(503).body("overloaded");
        });
        let mut config = AppConfig::default();
        config.narrative.base_url = server.base_url();

        let args = estimate_args(&["prophet", "estimate", "--explain", "--as-of-year", "2024"]);
        let mut out = Vec::new();
        let err = write_estimate(&args, &config, |_| Some("key".to_string()), &mut out).unwrap_err();

        assert_eq!(err.exit_code(), crate::error::EXIT_RUNTIME);
        assert!(String::from_utf8(out).unwrap().contains("Estimated price: $1,663,200"));
    }

    #[test]
    fn current_year_is_plausible() {
        assert!(current_year() >= 2024);
    }
}
