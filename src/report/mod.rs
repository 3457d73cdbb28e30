//! Reporting utilities: currency formatting, text output, and JSON output.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::domain::{PropertyFeatures, ValuationResult};
use crate::error::AppError;

/// JSON shape printed by `prophet estimate --json`.
#[derive(Debug, Serialize)]
pub struct EstimateReport<'a> {
    pub as_of_year: i32,
    pub features: &'a PropertyFeatures,
    pub valuation: &'a ValuationResult,
    /// Narrative text, present only when it was requested and succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<&'a str>,
    /// Narrative failure notice, present only when the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_error: Option<String>,
}

impl EstimateReport<'_> {
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::runtime(format!("Failed to serialize report: {e}")))
    }
}
