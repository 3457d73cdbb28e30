//! Command-line parsing for the property valuer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the valuation and narrative code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_BATHROOMS, DEFAULT_BEDROOMS, DEFAULT_CONDITION, DEFAULT_GRADE, DEFAULT_LIVING_AREA_SQFT,
    DEFAULT_YEAR_BUILT, DEFAULT_ZIP_CODE, PropertyFeatures,
};

pub mod form;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "prophet", version, about = "Residential property valuation with AI market commentary")]
pub struct Cli {
    /// Config file (TOML). Defaults to ./prophet.toml when present.
    #[arg(long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Debug-level logging for this crate.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value one property and print the estimate.
    Estimate(EstimateArgs),
    /// Launch the interactive TUI (the default).
    Tui(TuiArgs),
    /// List recognized zip codes and their location multipliers.
    Zips,
}

/// Property features as flags. Defaults describe a mid-grade 1995 house in 98103.
#[derive(Debug, Args, Clone)]
pub struct FeatureArgs {
    /// Living area in square feet (min 500).
    #[arg(long, default_value_t = DEFAULT_LIVING_AREA_SQFT)]
    pub sqft: f64,

    /// Bedrooms (1-15).
    #[arg(long, default_value_t = DEFAULT_BEDROOMS)]
    pub bedrooms: u32,

    /// Bathrooms in half steps (1.0-10.0).
    #[arg(long, default_value_t = DEFAULT_BATHROOMS)]
    pub bathrooms: f64,

    /// Year built (1900 to the as-of year).
    #[arg(long, default_value_t = DEFAULT_YEAR_BUILT)]
    pub year_built: i32,

    /// Year of the last major renovation.
    #[arg(long)]
    pub year_renovated: Option<i32>,

    /// Construction grade (1-13).
    #[arg(long, default_value_t = DEFAULT_GRADE)]
    pub grade: u8,

    /// Condition (1-5).
    #[arg(long, default_value_t = DEFAULT_CONDITION)]
    pub condition: u8,

    /// Five-digit zip code. Unlisted codes get a neutral location multiplier.
    #[arg(long, default_value = DEFAULT_ZIP_CODE)]
    pub zip: String,
}

impl FeatureArgs {
    pub fn to_features(&self) -> PropertyFeatures {
        PropertyFeatures {
            living_area_sqft: self.sqft,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            year_built: self.year_built,
            grade: self.grade,
            condition: self.condition,
            zip_code: self.zip.trim().to_string(),
            year_renovated: self.year_renovated,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub features: FeatureArgs,

    /// Price as of this year (defaults to the current year).
    #[arg(long)]
    pub as_of_year: Option<i32>,

    /// Prompt for each feature on stdin instead of using flags.
    #[arg(short, long)]
    pub interactive: bool,

    /// Also request an AI market analysis (needs the API key).
    #[arg(long)]
    pub explain: bool,

    /// Print the term-by-term breakdown.
    #[arg(long)]
    pub breakdown: bool,

    /// Print the regional market trend table.
    #[arg(long)]
    pub trends: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Initial form values.
    #[command(flatten)]
    pub features: FeatureArgs,

    /// Price as of this year (defaults to the current year).
    #[arg(long)]
    pub as_of_year: Option<i32>,

    /// Run pricing-only, without the AI analysis.
    #[arg(long)]
    pub no_ai: bool,
}
