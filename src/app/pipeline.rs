//! Shared request logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> estimate -> (optionally) explain
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::{debug, info, warn};

use crate::domain::{PropertyFeatures, ValidationError, ValuationResult};
use crate::narrative::{NarrativeError, NarrativeGenerator};
use crate::valuation::estimate;

/// Validate `features` and price them.
///
/// This is the only path front-ends use to reach the valuation engine, so
/// out-of-range input is rejected here rather than priced.
pub fn run_valuation(features: &PropertyFeatures, as_of_year: i32) -> Result<ValuationResult, ValidationError> {
    features.validate(as_of_year)?;

    let result = estimate(features, as_of_year);
    info!(
        zip = %features.zip_code,
        point_estimate = result.point_estimate,
        floored = result.breakdown.floored,
        "valuation computed"
    );
    debug!(breakdown = ?result.breakdown, "valuation breakdown");
    Ok(result)
}

/// Request commentary for an already computed valuation.
pub fn run_narrative(
    narrator: &dyn NarrativeGenerator,
    valuation: &ValuationResult,
    features: &PropertyFeatures,
) -> Result<String, NarrativeError> {
    narrator
        .explain(valuation.point_estimate, features)
        .inspect_err(|err| warn!(error = %err, "market analysis failed"))
}
