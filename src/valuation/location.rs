//! Location multipliers keyed by postal code.

use serde::Serialize;

/// Multiplier for postal codes that are not in the table.
///
/// Unknown locations get no adjustment.
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

/// One recognized postal code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub zip_code: &'static str,
    pub neighborhood: &'static str,
    pub multiplier: f64,
}

/// Fixed mapping from postal code to location multiplier.
///
/// Lookups for absent codes fall back to [`DEFAULT_MULTIPLIER`].
#[derive(Debug, Clone, Copy)]
pub struct LocationTable {
    entries: &'static [Location],
}

pub const LOCATIONS: LocationTable = LocationTable {
    entries: &[
        Location { zip_code: "98103", neighborhood: "Seattle Central", multiplier: 1.4 },
        Location { zip_code: "98004", neighborhood: "Bellevue", multiplier: 2.1 },
        Location { zip_code: "98033", neighborhood: "Kirkland", multiplier: 1.6 },
        Location { zip_code: "98112", neighborhood: "Capitol Hill", multiplier: 1.95 },
        Location { zip_code: "98052", neighborhood: "Redmond", multiplier: 1.5 },
        Location { zip_code: "98001", neighborhood: "Auburn", multiplier: 0.85 },
        Location { zip_code: "98101", neighborhood: "Downtown Seattle", multiplier: 1.8 },
    ],
};

impl LocationTable {
    pub fn entries(&self) -> &'static [Location] {
        self.entries
    }

    pub fn lookup(&self, zip_code: &str) -> Option<&'static Location> {
        let zip_code = zip_code.trim();
        self.entries.iter().find(|loc| loc.zip_code == zip_code)
    }

    /// Multiplier for `zip_code`, or [`DEFAULT_MULTIPLIER`] when unlisted.
    pub fn multiplier_for(&self, zip_code: &str) -> f64 {
        self.lookup(zip_code)
            .map(|loc| loc.multiplier)
            .unwrap_or(DEFAULT_MULTIPLIER)
    }

    /// Position of `zip_code` in the table (used by the TUI to cycle codes).
    pub fn position(&self, zip_code: &str) -> Option<usize> {
        let zip_code = zip_code.trim();
        self.entries.iter().position(|loc| loc.zip_code == zip_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(LOCATIONS.multiplier_for("98103"), 1.4);
        assert_eq!(LOCATIONS.multiplier_for("98004"), 2.1);
        assert_eq!(LOCATIONS.lookup("98001").map(|l| l.neighborhood), Some("Auburn"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(LOCATIONS.multiplier_for(" 98112 "), 1.95);
    }

    #[test]
    fn unknown_codes_fall_back_to_neutral() {
        assert_eq!(LOCATIONS.multiplier_for("10001"), DEFAULT_MULTIPLIER);
        assert_eq!(LOCATIONS.multiplier_for(""), DEFAULT_MULTIPLIER);
        assert!(LOCATIONS.lookup("default").is_none());
    }

    #[test]
    fn codes_are_unique() {
        let entries = LOCATIONS.entries();
        for (i, a) in entries.iter().enumerate() {
            assert!(entries[i + 1..].iter().all(|b| b.zip_code != a.zip_code));
        }
    }
}
