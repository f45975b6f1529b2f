use rust_decimal::Decimal;
use thiserror::Error;

/// Precondition failures detected before any store call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a category")]
    MissingCategory,

    #[error("Please select a product")]
    MissingProduct,

    #[error("Quantity must be at least 1")]
    NonPositiveQuantity,

    #[error("Insufficient stock for this transaction")]
    InsufficientStock,

    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn non_negative(field: &'static str, value: i32) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative(field));
    }
    Ok(())
}

pub fn non_negative_decimal(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative(field));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Empty text fields are stored as NULL.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_not_present() {
        assert_eq!(required("Name", "  "), Err(ValidationError::Required("Name")));
        assert!(required("Name", "Widget").is_ok());
    }

    #[test]
    fn zero_price_is_allowed() {
        assert!(non_negative_decimal("Unit price", Decimal::ZERO).is_ok());
        assert!(non_negative_decimal("Unit price", Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn email_needs_both_halves() {
        assert!(email("a@b.io").is_ok());
        assert!(email("@b.io").is_err());
        assert!(email("ab.io").is_err());
    }

    #[test]
    fn optional_text_is_trimmed() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" bench ".into())).as_deref(), Some("bench"));
    }

    #[test]
    fn password_message_mentions_length() {
        assert_eq!(
            password("12345").unwrap_err().to_string(),
            "Password should be at least 6 characters"
        );
    }
}
