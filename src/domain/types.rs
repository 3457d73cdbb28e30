//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built from CLI flags, the stdin form, or the TUI form
//! - passed by value through the valuation pipeline
//! - rendered as text or JSON

use serde::{Deserialize, Serialize};

/// Default form values (a mid-grade 1995 house in Seattle Central).
pub const DEFAULT_LIVING_AREA_SQFT: f64 = 2200.0;
pub const DEFAULT_BEDROOMS: u32 = 3;
pub const DEFAULT_BATHROOMS: f64 = 2.5;
pub const DEFAULT_YEAR_BUILT: i32 = 1995;
pub const DEFAULT_GRADE: u8 = 7;
pub const DEFAULT_CONDITION: u8 = 3;
pub const DEFAULT_ZIP_CODE: &str = "98103";

/// Structural attributes of a single residential property.
///
/// The record is a plain value: front-ends build a new one for every request
/// rather than mutating a shared instance. Range checks live in
/// [`PropertyFeatures::validate`](super::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFeatures {
    /// Finished living area in square feet (minimum 500).
    pub living_area_sqft: f64,
    /// Number of bedrooms (1–15).
    pub bedrooms: u32,
    /// Number of bathrooms in half increments (1.0–10.0).
    pub bathrooms: f64,
    /// Year of original construction (1900 to the as-of year).
    pub year_built: i32,
    /// Construction-quality grade (1–13).
    pub grade: u8,
    /// Overall condition (1–5). Shown to the analyst; carries no weight in the model.
    pub condition: u8,
    /// Five-digit postal code used for the location multiplier.
    pub zip_code: String,
    /// Year of the last major renovation, if any.
    ///
    /// When later than `year_built` it becomes the effective year for the
    /// age penalty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_renovated: Option<i32>,
}

impl Default for PropertyFeatures {
    fn default() -> Self {
        Self {
            living_area_sqft: DEFAULT_LIVING_AREA_SQFT,
            bedrooms: DEFAULT_BEDROOMS,
            bathrooms: DEFAULT_BATHROOMS,
            year_built: DEFAULT_YEAR_BUILT,
            grade: DEFAULT_GRADE,
            condition: DEFAULT_CONDITION,
            zip_code: DEFAULT_ZIP_CODE.to_string(),
            year_renovated: None,
        }
    }
}

impl PropertyFeatures {
    /// The year the age penalty is measured from.
    pub fn effective_year(&self) -> i32 {
        match self.year_renovated {
            Some(renovated) => self.year_built.max(renovated),
            None => self.year_built,
        }
    }
}

/// Per-term contributions of the weighted sum, kept for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationBreakdown {
    pub intercept: f64,
    pub living_area: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub grade: f64,
    pub age: f64,
    /// `as_of_year - effective_year`; may be negative for future build years.
    pub age_years: i32,
    /// Sum of all terms above, before the location multiplier.
    pub weighted_sum: f64,
    /// Location multiplier actually applied.
    pub multiplier: f64,
    /// Whether the zip code was found in the location table.
    pub location_listed: bool,
    /// Whether the price floor replaced the computed value.
    pub floored: bool,
}

/// Output of a single valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Best-guess price in whole currency units.
    pub point_estimate: u64,
    /// `floor(0.92 × point_estimate)`.
    pub confidence_low: u64,
    /// `floor(1.08 × point_estimate)`.
    pub confidence_high: u64,
    pub breakdown: ValuationBreakdown,
}
