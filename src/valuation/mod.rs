//! Closed-form property valuation.
//!
//! A weighted linear model over a handful of structural features, adjusted by a
//! per-zip-code location multiplier and floored at a minimum price. Every
//! coefficient is a named constant (`coefficients`) and every location a row in
//! a fixed table (`location`), so estimates are explainable term by term.

pub mod coefficients;
pub mod engine;
pub mod location;

pub use coefficients::*;
pub use engine::*;
pub use location::*;
