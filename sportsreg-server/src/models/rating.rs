//! Feedback rating

use super::ValidationError;

const MIN_RATING: i64 = 1;
const MAX_RATING: i64 = 5;

/// Validated feedback rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(i32);

impl Rating {
    /// # Example
    /// ```
    /// use sportsreg_server::models::Rating;
    ///
    /// assert!(Rating::new(4).is_ok());
    /// assert!(Rating::new(0).is_err());
    /// assert!(Rating::new(6).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: "Rating",
                min: MIN_RATING,
                max: MAX_RATING,
            });
        }
        Ok(Self(value as i32))
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}
