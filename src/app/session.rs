//! The "last computed result" held by a front-end.
//!
//! A `Session` is owned by whoever drives requests (the TUI event loop, a CLI
//! invocation). It holds at most one result; every successful valuation
//! replaces it. Narrative outcomes are attached to that result and never alter
//! the price.

use crate::app::pipeline::{run_narrative, run_valuation};
use crate::domain::{PropertyFeatures, ValidationError, ValuationResult};
use crate::narrative::{NarrativeError, NarrativeGenerator};

#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeState {
    NotRequested,
    Ready(String),
    Failed(NarrativeError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastResult {
    pub features: PropertyFeatures,
    pub as_of_year: i32,
    pub valuation: ValuationResult,
    pub narrative: NarrativeState,
}

#[derive(Debug, Default)]
pub struct Session {
    last: Option<LastResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&LastResult> {
        self.last.as_ref()
    }

    /// Value `features` and make the result the current one.
    ///
    /// On a validation error the previous result is kept.
    pub fn value(&mut self, features: PropertyFeatures, as_of_year: i32) -> Result<&LastResult, ValidationError> {
        let valuation = run_valuation(&features, as_of_year)?;
        let last = self.last.insert(LastResult {
            features,
            as_of_year,
            valuation,
            narrative: NarrativeState::NotRequested,
        });
        Ok(&*last)
    }

    /// Request commentary for the current result.
    ///
    /// Returns `None` when nothing has been valued yet.
    pub fn explain(&mut self, narrator: &dyn NarrativeGenerator) -> Option<&NarrativeState> {
        let last = self.last.as_mut()?;
        last.narrative = match run_narrative(narrator, &last.valuation, &last.features) {
            Ok(text) => NarrativeState::Ready(text),
            Err(err) => NarrativeState::Failed(err),
        };
        Some(&last.narrative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::testing::ScriptedNarrator;

    #[test]
    fn each_valuation_overwrites_the_last_result() {
        let mut session = Session::new();
        assert!(session.last().is_none());

        session.value(PropertyFeatures::default(), 2024).unwrap();
        let bigger = PropertyFeatures { living_area_sqft: 3000.0, ..Default::default() };
        session.value(bigger.clone(), 2024).unwrap();

        let last = session.last().unwrap();
        assert_eq!(last.features, bigger);
        assert_eq!(last.narrative, NarrativeState::NotRequested);
    }

    #[test]
    fn invalid_request_keeps_previous_result() {
        let mut session = Session::new();
        session.value(PropertyFeatures::default(), 2024).unwrap();

        let bad = PropertyFeatures { grade: 0, ..Default::default() };
        assert!(session.value(bad, 2024).is_err());
        assert_eq!(session.last().unwrap().valuation.point_estimate, 1_663_200);
    }

    #[test]
    fn narrative_failure_keeps_price_available() {
        let mut session = Session::new();
        session.value(PropertyFeatures::default(), 2024).unwrap();

        let narrator = ScriptedNarrator::failing(NarrativeError::Network("timed out".to_string()));
        let state = session.explain(&narrator).cloned();

        assert_eq!(state, Some(NarrativeState::Failed(NarrativeError::Network("timed out".to_string()))));
        let last = session.last().unwrap();
        assert_eq!(last.valuation.point_estimate, 1_663_200);
        assert_eq!(last.valuation.confidence_low, 1_530_144);
    }

    #[test]
    fn successful_narrative_is_attached() {
        let mut session = Session::new();
        session.value(PropertyFeatures::default(), 2024).unwrap();

        let narrator = ScriptedNarrator::ok("Fairly priced.");
        session.explain(&narrator);
        assert_eq!(session.last().unwrap().narrative, NarrativeState::Ready("Fairly priced.".to_string()));
    }

    #[test]
    fn explain_without_a_result_does_not_call_the_service() {
        let mut session = Session::new();
        let narrator = ScriptedNarrator::ok("unused");
        assert!(session.explain(&narrator).is_none());
        assert_eq!(narrator.calls.get(), 0);
    }

    #[test]
    fn new_valuation_resets_narrative() {
        let mut session = Session::new();
        session.value(PropertyFeatures::default(), 2024).unwrap();
        session.explain(&ScriptedNarrator::ok("old"));

        session.value(PropertyFeatures::default(), 2024).unwrap();
        assert_eq!(session.last().unwrap().narrative, NarrativeState::NotRequested);
    }
}
