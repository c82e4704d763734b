//! Common validation utilities shared across parameter groups.

use std::fmt;

/// Error type for common validation failures.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonValidationError {
    /// Human-readable error message.
    pub message: String,
}

impl CommonValidationError {
    /// Creates a new validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommonValidationError {}

/// Validate that a value is positive (> 0) and finite.
///
/// # Example
/// ```
/// use sincvox_spec::validation::common::validate_positive;
///
/// assert!(validate_positive("cutoff_hz", 500.0).is_ok());
/// assert!(validate_positive("cutoff_hz", 0.0).is_err());
/// assert!(validate_positive("cutoff_hz", f64::NAN).is_err());
/// ```
pub fn validate_positive(name: &str, value: f64) -> Result<(), CommonValidationError> {
    if !value.is_finite() {
        return Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    if value <= 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is finite.
pub fn validate_finite(name: &str, value: f64) -> Result<(), CommonValidationError> {
    if !value.is_finite() {
        return Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value lies strictly inside `(0, max)`.
///
/// # Example
/// ```
/// use sincvox_spec::validation::common::validate_open_interval;
///
/// assert!(validate_open_interval("cutoff_hz", 500.0, 8000.0).is_ok());
/// assert!(validate_open_interval("cutoff_hz", 8000.0, 8000.0).is_err());
/// ```
pub fn validate_open_interval(
    name: &str,
    value: f64,
    max: f64,
) -> Result<(), CommonValidationError> {
    validate_positive(name, value)?;
    if value >= max {
        return Err(CommonValidationError::new(format!(
            "{} must be below {}, got {}",
            name, max, value
        )));
    }
    Ok(())
}
