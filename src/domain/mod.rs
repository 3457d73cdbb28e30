//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the property input record (`PropertyFeatures`) and its range checks
//! - valuation outputs (`ValuationResult`, `ValuationBreakdown`)

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::*;
