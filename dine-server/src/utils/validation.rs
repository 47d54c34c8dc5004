//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! CRUD handlers. SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;
use shared::ErrorCode;

// ── Text length limits ──────────────────────────────────────────────

/// Person and product names
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

/// Table labels ("T1", "Patio 4")
pub const MAX_TABLE_NAME_LEN: usize = 50;

/// Descriptions, feedback messages and replies
pub const MAX_NOTE_LEN: usize = 500;

/// Contact form and review bodies
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Phone numbers and similar short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 32;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Image URLs
pub const MAX_URL_LEN: usize = 2048;

// ── Numeric limits ──────────────────────────────────────────────────

pub const MAX_PRICE: f64 = 10_000.0;
pub const MIN_TABLE_CAPACITY: i32 = 1;
pub const MAX_TABLE_CAPACITY: i32 = 50;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// A name of 2 to 100 characters after trimming
pub fn validate_name(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_NAME_LEN)?;
    if value.trim().chars().count() < MIN_NAME_LEN {
        return Err(AppError::validation(format!(
            "{field} must be at least {MIN_NAME_LEN} characters"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Minimal shape check: `local@domain.tld`, no whitespace
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let invalid = || {
        AppError::with_message(ErrorCode::InvalidFormat, "Invalid email address")
            .with_detail("field", "email")
    };
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Lowercased, trimmed email used as the lookup key
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Product prices must be positive and at most [`MAX_PRICE`]
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price <= 0.0 || price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("Price must be greater than 0 and at most {MAX_PRICE}"),
        )
        .with_detail("price", price));
    }
    Ok(())
}

pub fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if !(MIN_TABLE_CAPACITY..=MAX_TABLE_CAPACITY).contains(&capacity) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Capacity must be between {MIN_TABLE_CAPACITY} and {MAX_TABLE_CAPACITY}"),
        )
        .with_detail("capacity", capacity));
    }
    Ok(())
}

pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::with_message(
            ErrorCode::RatingOutOfRange,
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
        )
        .with_detail("rating", rating));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Soup", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("Al", "name").is_ok());
        assert!(validate_name(" A ", "name").is_err());
        assert!(validate_name(&"y".repeat(101), "name").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("ada@example.com").is_ok());
        for bad in ["ada", "@example.com", "ada@example", "a b@example.com", "a@b@c.com"] {
            let err = validate_email(bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidFormat, "{bad}");
        }
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_numeric_limits() {
        assert!(validate_price(0.01).is_ok());
        assert!(validate_price(10_000.0).is_ok());
        assert_eq!(
            validate_price(0.0).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
        assert!(validate_price(10_000.01).is_err());
        assert!(validate_price(f64::NAN).is_err());

        assert!(validate_capacity(1).is_ok());
        assert!(validate_capacity(51).is_err());

        assert!(validate_rating(5).is_ok());
        assert_eq!(validate_rating(0).unwrap_err().code, ErrorCode::RatingOutOfRange);
    }
}
