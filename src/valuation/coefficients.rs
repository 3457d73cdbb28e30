//! Fixed coefficient table for the linear price model.
//!
//! The weights are simulated regression coefficients in the spirit of the
//! King County house-sales data set. They are named constants rather than a
//! fitted model so every estimate can be traced back to a single line here.

use nalgebra::SVector;

/// Number of terms in the design row (intercept included).
pub const TERM_COUNT: usize = 6;

/// Minimum price the model will ever report.
pub const PRICE_FLOOR: f64 = 150_000.0;

/// Confidence band, as integer percentages of the point estimate.
pub const CONFIDENCE_LOW_PCT: u64 = 92;
pub const CONFIDENCE_HIGH_PCT: u64 = 108;

/// Weights of the linear model, one per design-row term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionWeights {
    pub intercept: f64,
    /// Per square foot of living area.
    pub living_area_sqft: f64,
    /// Per bedroom. Negative: more rooms in the same footprint reads as over-subdivision.
    pub bedrooms: f64,
    /// Per bathroom (half baths count 0.5).
    pub bathrooms: f64,
    /// Per construction-grade point.
    pub grade: f64,
    /// Per year of age since the effective build year.
    pub age_penalty: f64,
}

pub const WEIGHTS: RegressionWeights = RegressionWeights {
    intercept: -40_000.0,
    living_area_sqft: 280.0,
    bedrooms: -35_000.0,
    bathrooms: 41_000.0,
    grade: 94_000.0,
    age_penalty: -1_500.0,
};

impl RegressionWeights {
    /// Weights in design-row order: intercept, area, bedrooms, bathrooms, grade, age.
    pub fn as_vector(&self) -> SVector<f64, TERM_COUNT> {
        SVector::<f64, TERM_COUNT>::from([
            self.intercept,
            self.living_area_sqft,
            self.bedrooms,
            self.bathrooms,
            self.grade,
            self.age_penalty,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_order_matches_fields() {
        let v = WEIGHTS.as_vector();
        assert_eq!(v[0], WEIGHTS.intercept);
        assert_eq!(v[1], WEIGHTS.living_area_sqft);
        assert_eq!(v[5], WEIGHTS.age_penalty);
    }

    #[test]
    fn living_area_weight_is_positive() {
        assert!(WEIGHTS.living_area_sqft > 0.0);
    }
}
