//! Field-level validation for template payloads.
//!
//! Request-shape validation happens upstream; these checks guard the
//! invariants the catalog itself relies on (non-negative money, bounded
//! rating, bounded text).

use crate::error::CoreError;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 150;

/// Maximum short description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Validate a template title (non-empty, bounded).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a short description (non-empty, bounded).
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation("Description must not be empty".into()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a monetary amount: finite and not negative.
pub fn validate_amount(field: &str, amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative amount"
        )));
    }
    Ok(())
}

/// Validate an optional monetary amount.
pub fn validate_optional_amount(field: &str, amount: Option<f64>) -> Result<(), CoreError> {
    match amount {
        Some(value) => validate_amount(field, value),
        None => Ok(()),
    }
}

/// Validate a rating value in `[0, 5]` and its review count.
pub fn validate_rating(rating: f64, review_count: i64) -> Result<(), CoreError> {
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between 0 and {MAX_RATING}"
        )));
    }
    if review_count < 0 {
        return Err(CoreError::Validation(
            "Review count must not be negative".into(),
        ));
    }
    Ok(())
}
