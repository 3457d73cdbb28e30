//! Range checks for [`PropertyFeatures`].
//!
//! Validation runs in the request pipeline, before the valuation engine is
//! called. The engine itself accepts any value of the right type and never
//! clamps or rejects.

use thiserror::Error;

use super::PropertyFeatures;

pub const MIN_LIVING_AREA_SQFT: f64 = 500.0;
pub const BEDROOMS_RANGE: (u32, u32) = (1, 15);
pub const BATHROOMS_RANGE: (f64, f64) = (1.0, 10.0);
pub const MIN_YEAR_BUILT: i32 = 1900;
pub const GRADE_RANGE: (u8, u8) = (1, 13);
pub const CONDITION_RANGE: (u8, u8) = (1, 5);

/// A feature value outside its declared bound.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("living area must be a finite number of at least {min} sqft (got {value})")]
    LivingArea { value: f64, min: f64 },
    #[error("bedrooms must be between {min} and {max} (got {value})")]
    Bedrooms { value: u32, min: u32, max: u32 },
    #[error("bathrooms must be between {min} and {max} in steps of 0.5 (got {value})")]
    Bathrooms { value: f64, min: f64, max: f64 },
    #[error("year built must be between {min} and {max} (got {value})")]
    YearBuilt { value: i32, min: i32, max: i32 },
    #[error("year renovated must be between {min} and {max} (got {value})")]
    YearRenovated { value: i32, min: i32, max: i32 },
    #[error("grade must be between {min} and {max} (got {value})")]
    Grade { value: u8, min: u8, max: u8 },
    #[error("condition must be between {min} and {max} (got {value})")]
    Condition { value: u8, min: u8, max: u8 },
    #[error("zip code must be five digits (got '{value}')")]
    ZipCode { value: String },
}

impl PropertyFeatures {
    /// Check every field against its bound.
    ///
    /// `as_of_year` caps `year_built` and `year_renovated`. The first failing
    /// field is reported.
    pub fn validate(&self, as_of_year: i32) -> Result<(), ValidationError> {
        if !(self.living_area_sqft.is_finite() && self.living_area_sqft >= MIN_LIVING_AREA_SQFT) {
            return Err(ValidationError::LivingArea {
                value: self.living_area_sqft,
                min: MIN_LIVING_AREA_SQFT,
            });
        }

        let (min, max) = BEDROOMS_RANGE;
        if !(min..=max).contains(&self.bedrooms) {
            return Err(ValidationError::Bedrooms { value: self.bedrooms, min, max });
        }

        let (min, max) = BATHROOMS_RANGE;
        let half_step = (self.bathrooms * 2.0).fract() == 0.0;
        if !(self.bathrooms.is_finite() && (min..=max).contains(&self.bathrooms) && half_step) {
            return Err(ValidationError::Bathrooms { value: self.bathrooms, min, max });
        }

        if !(MIN_YEAR_BUILT..=as_of_year).contains(&self.year_built) {
            return Err(ValidationError::YearBuilt {
                value: self.year_built,
                min: MIN_YEAR_BUILT,
                max: as_of_year,
            });
        }

        if let Some(renovated) = self.year_renovated {
            if !(self.year_built..=as_of_year).contains(&renovated) {
                return Err(ValidationError::YearRenovated {
                    value: renovated,
                    min: self.year_built,
                    max: as_of_year,
                });
            }
        }

        let (min, max) = GRADE_RANGE;
        if !(min..=max).contains(&self.grade) {
            return Err(ValidationError::Grade { value: self.grade, min, max });
        }

        let (min, max) = CONDITION_RANGE;
        if !(min..=max).contains(&self.condition) {
            return Err(ValidationError::Condition { value: self.condition, min, max });
        }

        let zip = self.zip_code.as_str();
        if zip.len() != 5 || !zip.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::ZipCode { value: self.zip_code.clone() });
        }

        Ok(())
    }
}
