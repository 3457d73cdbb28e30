//! The valuation function.
//!
//! `estimate` relies on two primitive operations, mirroring how a fitted linear
//! model would be evaluated:
//! - build a design row from the features (intercept first)
//! - weight it term-by-term with the coefficient table
//!
//! The location multiplier, the floor and the confidence band are applied to
//! the weighted sum afterwards.

use nalgebra::SVector;

use super::coefficients::{
    CONFIDENCE_HIGH_PCT, CONFIDENCE_LOW_PCT, PRICE_FLOOR, RegressionWeights, TERM_COUNT, WEIGHTS,
};
use super::location::{LOCATIONS, LocationTable};
use crate::domain::{PropertyFeatures, ValuationBreakdown, ValuationResult};

/// Estimate the market price of `features` as of `as_of_year`.
///
/// Pure and total: no I/O, no randomness, no range checks. Callers are
/// expected to run [`PropertyFeatures::validate`] first; values outside the
/// form bounds are priced as given.
pub fn estimate(features: &PropertyFeatures, as_of_year: i32) -> ValuationResult {
    estimate_with(&WEIGHTS, &LOCATIONS, features, as_of_year)
}

/// [`estimate`] against an explicit coefficient and location table.
pub fn estimate_with(
    weights: &RegressionWeights,
    locations: &LocationTable,
    features: &PropertyFeatures,
    as_of_year: i32,
) -> ValuationResult {
    let age_years = as_of_year - features.effective_year();

    let terms = design_row(features, age_years).component_mul(&weights.as_vector());
    let weighted_sum = terms.sum();

    let location = locations.lookup(&features.zip_code);
    let multiplier = locations.multiplier_for(&features.zip_code);

    let adjusted = weighted_sum * multiplier;
    let floored = adjusted.is_nan() || adjusted < PRICE_FLOOR;
    let point_estimate = round_currency(adjusted.max(PRICE_FLOOR));

    ValuationResult {
        point_estimate,
        confidence_low: scale_pct(point_estimate, CONFIDENCE_LOW_PCT),
        confidence_high: scale_pct(point_estimate, CONFIDENCE_HIGH_PCT),
        breakdown: ValuationBreakdown {
            intercept: terms[0],
            living_area: terms[1],
            bedrooms: terms[2],
            bathrooms: terms[3],
            grade: terms[4],
            age: terms[5],
            age_years,
            weighted_sum,
            multiplier,
            location_listed: location.is_some(),
            floored,
        },
    }
}

/// Fill the design row for `features`.
///
/// Order: intercept (constant 1), living area, bedrooms, bathrooms, grade, age.
pub fn design_row(features: &PropertyFeatures, age_years: i32) -> SVector<f64, TERM_COUNT> {
    SVector::<f64, TERM_COUNT>::from([
        1.0,
        features.living_area_sqft,
        f64::from(features.bedrooms),
        features.bathrooms,
        f64::from(features.grade),
        f64::from(age_years),
    ])
}

/// Round half away from zero to whole currency units.
fn round_currency(price: f64) -> u64 {
    // `as` saturates for out-of-range floats; the floor keeps `price` positive.
    price.round() as u64
}

/// `floor(point × pct / 100)` in exact integer arithmetic.
fn scale_pct(point: u64, pct: u64) -> u64 {
    let scaled = u128::from(point) * u128::from(pct) / 100;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
