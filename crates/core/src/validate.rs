//! Pure field validators shared by the entity layer.
//!
//! Each validator either returns the accepted value or a
//! [`DomainError::Validation`] naming the field. None of them mutate anything.

use crate::error::{DomainError, DomainResult};

/// Non-blank text of at most `max` characters, stored without surrounding
/// whitespace.
pub fn text(field: &str, value: &str, max: usize) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max} characters (got {len})"),
        ));
    }
    Ok(value.to_owned())
}

/// Optional text of at most `max` characters (may be empty).
pub fn optional_text(field: &str, value: &str, max: usize) -> DomainResult<String> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max} characters (got {len})"),
        ));
    }
    Ok(value.to_owned())
}

/// Finite number within `[min, max]`.
pub fn in_range(field: &str, value: f64, min: f64, max: f64) -> DomainResult<f64> {
    if !value.is_finite() || value < min || value > max {
        return Err(DomainError::validation(
            field,
            format!("must be within [{min}, {max}] (got {value})"),
        ));
    }
    Ok(value)
}

/// Finite, non-negative number.
pub fn non_negative(field: &str, value: f64) -> DomainResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(
            field,
            format!("must be a non-negative number (got {value})"),
        ));
    }
    Ok(value)
}

/// Integer within `[min, max]`.
pub fn int_in_range(field: &str, value: i64, min: i64, max: i64) -> DomainResult<i64> {
    if !(min..=max).contains(&value) {
        return Err(DomainError::validation(
            field,
            format!("must be an integer between {min} and {max} (got {value})"),
        ));
    }
    Ok(value)
}
