//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required request fields are missing
    Required { message: &'static str },

    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field is shorter than allowed
    TooShort { field: &'static str, min: usize },

    /// String doesn't match required format (e.g., email, timestamp)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Numeric value outside the accepted range
    OutOfRange { field: &'static str, min: i64, max: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { message } => f.write_str(message),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim a required text field, rejecting missing or blank values.
pub fn required_text(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.map(|v| v.trim().to_owned()).unwrap_or_default();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}
