//! Validation errors for value objects and request parameters.

use thiserror::Error;

/// Errors that occur when constructing value objects or checking
/// search and booking parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Missing required parameter '{parameter}'")]
    MissingParameter { parameter: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing parameter validation error.
    pub fn missing_parameter(parameter: impl Into<String>) -> Self {
        ValidationError::MissingParameter {
            parameter: parameter.into(),
        }
    }

    /// Name of the offending field or parameter.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::MissingParameter { parameter } => parameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_displays_correctly() {
        let err = ValidationError::empty_field("destination");
        assert_eq!(format!("{}", err), "Field 'destination' cannot be empty");
    }

    #[test]
    fn out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("adults", 1, 9, 0);
        assert_eq!(
            format!("{}", err),
            "Field 'adults' must be between 1 and 9, got 0"
        );
    }

    #[test]
    fn missing_parameter_displays_correctly() {
        let err = ValidationError::missing_parameter("payment_token");
        assert_eq!(
            format!("{}", err),
            "Missing required parameter 'payment_token'"
        );
    }

    #[test]
    fn field_returns_offending_name() {
        assert_eq!(ValidationError::invalid_format("check_out", "before check_in").field(), "check_out");
        assert_eq!(ValidationError::missing_parameter("email").field(), "email");
    }
}
