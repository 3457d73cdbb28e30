//! Property form state for the TUI.
//!
//! Arrow keys step a field within its form bounds; Enter opens a text edit for
//! an exact value. Bounds here only shape the widgets. Whatever the form holds
//! is still validated by the pipeline before it is priced.

use crate::domain::{
    BATHROOMS_RANGE, BEDROOMS_RANGE, CONDITION_RANGE, GRADE_RANGE, MIN_LIVING_AREA_SQFT, MIN_YEAR_BUILT,
    PropertyFeatures,
};
use crate::report::location_label;
use crate::valuation::LOCATIONS;

const SQFT_STEP: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LivingArea,
    Bedrooms,
    Bathrooms,
    YearBuilt,
    YearRenovated,
    Grade,
    Condition,
    ZipCode,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::LivingArea,
        Field::Bedrooms,
        Field::Bathrooms,
        Field::YearBuilt,
        Field::YearRenovated,
        Field::Grade,
        Field::Condition,
        Field::ZipCode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::LivingArea => "Living area",
            Field::Bedrooms => "Bedrooms",
            Field::Bathrooms => "Bathrooms",
            Field::YearBuilt => "Year built",
            Field::YearRenovated => "Renovated",
            Field::Grade => "Grade",
            Field::Condition => "Condition",
            Field::ZipCode => "Zip code",
        }
    }

    pub fn display(self, f: &PropertyFeatures) -> String {
        match self {
            Field::LivingArea => format!("{} sqft", f.living_area_sqft),
            Field::Bedrooms => f.bedrooms.to_string(),
            Field::Bathrooms => format!("{:.1}", f.bathrooms),
            Field::YearBuilt => f.year_built.to_string(),
            Field::YearRenovated => f.year_renovated.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
            Field::Grade => format!("{}/13", f.grade),
            Field::Condition => format!("{}/5", f.condition),
            Field::ZipCode => location_label(&f.zip_code),
        }
    }

    /// Raw value used to seed the text editor.
    pub fn raw(self, f: &PropertyFeatures) -> String {
        match self {
            Field::LivingArea => f.living_area_sqft.to_string(),
            Field::Bedrooms => f.bedrooms.to_string(),
            Field::Bathrooms => f.bathrooms.to_string(),
            Field::YearBuilt => f.year_built.to_string(),
            Field::YearRenovated => f.year_renovated.map(|y| y.to_string()).unwrap_or_default(),
            Field::Grade => f.grade.to_string(),
            Field::Condition => f.condition.to_string(),
            Field::ZipCode => f.zip_code.clone(),
        }
    }

    /// Characters accepted while editing this field.
    pub fn accepts(self, c: char) -> bool {
        match self {
            Field::LivingArea | Field::Bathrooms => c.is_ascii_digit() || c == '.',
            _ => c.is_ascii_digit(),
        }
    }

    /// Step the field by `delta` notches, staying inside the form bounds.
    pub fn step(self, f: &mut PropertyFeatures, delta: i32, as_of_year: i32) {
        match self {
            Field::LivingArea => {
                f.living_area_sqft = (f.living_area_sqft + SQFT_STEP * f64::from(delta)).max(MIN_LIVING_AREA_SQFT);
            }
            Field::Bedrooms => {
                let (min, max) = BEDROOMS_RANGE;
                f.bedrooms = f.bedrooms.saturating_add_signed(delta).clamp(min, max);
            }
            Field::Bathrooms => {
                let (min, max) = BATHROOMS_RANGE;
                f.bathrooms = (f.bathrooms + 0.5 * f64::from(delta)).clamp(min, max);
            }
            Field::YearBuilt => {
                let latest = as_of_year.max(MIN_YEAR_BUILT);
                f.year_built = f.year_built.saturating_add(delta).clamp(MIN_YEAR_BUILT, latest);
            }
            Field::YearRenovated => {
                f.year_renovated = match f.year_renovated {
                    None if delta > 0 => Some(as_of_year),
                    None => None,
                    Some(y) if y.saturating_add(delta) < f.year_built => None,
                    Some(y) => Some(y.saturating_add(delta).min(as_of_year)),
                };
            }
            Field::Grade => {
                let (min, max) = GRADE_RANGE;
                f.grade = (i32::from(f.grade) + delta).clamp(i32::from(min), i32::from(max)) as u8;
            }
            Field::Condition => {
                let (min, max) = CONDITION_RANGE;
                f.condition = (i32::from(f.condition) + delta).clamp(i32::from(min), i32::from(max)) as u8;
            }
            Field::ZipCode => {
                let entries = LOCATIONS.entries();
                let len = entries.len() as i32;
                let next = match LOCATIONS.position(&f.zip_code) {
                    Some(idx) => (idx as i32 + delta).rem_euclid(len),
                    None => 0,
                };
                f.zip_code = entries[next as usize].zip_code.to_string();
            }
        }
    }

    /// Apply a typed value. Empty input clears the renovation year.
    pub fn apply(self, f: &mut PropertyFeatures, input: &str) -> Result<(), String> {
        let input = input.trim();
        let invalid = || format!("Invalid {} '{input}'", self.label().to_lowercase());
        match self {
            Field::LivingArea => f.living_area_sqft = input.parse().map_err(|_| invalid())?,
            Field::Bedrooms => f.bedrooms = input.parse().map_err(|_| invalid())?,
            Field::Bathrooms => f.bathrooms = input.parse().map_err(|_| invalid())?,
            Field::YearBuilt => f.year_built = input.parse().map_err(|_| invalid())?,
            Field::YearRenovated => {
                f.year_renovated = if input.is_empty() {
                    None
                } else {
                    Some(input.parse().map_err(|_| invalid())?)
                };
            }
            Field::Grade => f.grade = input.parse().map_err(|_| invalid())?,
            Field::Condition => f.condition = input.parse().map_err(|_| invalid())?,
            Field::ZipCode => {
                if input.is_empty() {
                    return Err(invalid());
                }
                f.zip_code = input.to_string();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_stay_within_form_bounds() {
        let mut f = PropertyFeatures::default();
        for _ in 0..20 {
            Field::Grade.step(&mut f, 1, 2024);
            Field::Bedrooms.step(&mut f, -1, 2024);
            Field::Bathrooms.step(&mut f, 1, 2024);
            Field::YearBuilt.step(&mut f, 5, 2024);
        }
        assert_eq!(f.grade, 13);
        assert_eq!(f.bedrooms, 1);
        assert_eq!(f.bathrooms, 10.0);
        assert_eq!(f.year_built, 2024);

        let mut f = PropertyFeatures { living_area_sqft: 600.0, ..Default::default() };
        Field::LivingArea.step(&mut f, -5, 2024);
        assert_eq!(f.living_area_sqft, 500.0);
    }

    #[test]
    fn year_steps_survive_extreme_values() {
        // As-of year before the earliest allowed build year.
        let mut f = PropertyFeatures::default();
        Field::YearBuilt.step(&mut f, 1, 1850);
        assert_eq!(f.year_built, MIN_YEAR_BUILT);

        let mut f = PropertyFeatures::default();
        Field::YearBuilt.apply(&mut f, "2147483647").unwrap();
        Field::YearBuilt.step(&mut f, 1, 2024);
        assert_eq!(f.year_built, 2024);

        let mut f = PropertyFeatures { year_renovated: Some(i32::MAX), ..Default::default() };
        Field::YearRenovated.step(&mut f, 1, 2024);
        assert_eq!(f.year_renovated, Some(2024));

        let mut f = PropertyFeatures { year_built: i32::MIN, year_renovated: Some(i32::MIN), ..Default::default() };
        Field::YearRenovated.step(&mut f, -1, 2024);
        assert_eq!(f.year_renovated, Some(i32::MIN));
    }

    #[test]
    fn zip_cycles_through_the_table() {
        let mut f = PropertyFeatures::default();
        let start = f.zip_code.clone();
        for _ in 0..LOCATIONS.entries().len() {
            Field::ZipCode.step(&mut f, 1, 2024);
        }
        assert_eq!(f.zip_code, start);

        Field::ZipCode.step(&mut f, -1, 2024);
        assert_eq!(f.zip_code, LOCATIONS.entries().last().unwrap().zip_code);

        let mut f = PropertyFeatures { zip_code: "10001".to_string(), ..Default::default() };
        Field::ZipCode.step(&mut f, 1, 2024);
        assert_eq!(f.zip_code, LOCATIONS.entries()[0].zip_code);
    }

    #[test]
    fn renovation_toggles_on_and_off() {
        let mut f = PropertyFeatures::default();
        Field::YearRenovated.step(&mut f, -1, 2024);
        assert_eq!(f.year_renovated, None);
        Field::YearRenovated.step(&mut f, 1, 2024);
        assert_eq!(f.year_renovated, Some(2024));

        f.year_renovated = Some(f.year_built);
        Field::YearRenovated.step(&mut f, -1, 2024);
        assert_eq!(f.year_renovated, None);
    }

    #[test]
    fn typed_values_are_applied_or_reported() {
        let mut f = PropertyFeatures::default();
        Field::LivingArea.apply(&mut f, "1850.5").unwrap();
        assert_eq!(f.living_area_sqft, 1850.5);

        Field::ZipCode.apply(&mut f, " 98052 ").unwrap();
        assert_eq!(f.zip_code, "98052");

        let err = Field::Grade.apply(&mut f, "x").unwrap_err();
        assert_eq!(err, "Invalid grade 'x'");
        assert_eq!(f.grade, 7);

        f.year_renovated = Some(2000);
        Field::YearRenovated.apply(&mut f, "").unwrap();
        assert_eq!(f.year_renovated, None);
    }

    #[test]
    fn labels_and_display() {
        let f = PropertyFeatures::default();
        assert_eq!(Field::ZipCode.display(&f), "98103 (Seattle Central)");
        assert_eq!(Field::Bathrooms.display(&f), "2.5");
        assert_eq!(Field::YearRenovated.display(&f), "-");
        assert!(Field::LivingArea.accepts('.'));
        assert!(!Field::Grade.accepts('.'));
    }
}
