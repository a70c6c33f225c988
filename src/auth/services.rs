use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Rejects blank values of a required text field.
pub(crate) fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_email(email: &str) -> AppResult<()> {
    require_non_empty("email", email)?;
    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("First.Last+tag@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(require_non_empty("first_name", "Alice").is_ok());
        let err = require_non_empty("first_name", "  ").unwrap_err();
        assert_eq!(err.to_string(), "first_name must not be empty");
    }

    #[test]
    fn require_email_reports_format() {
        assert!(require_email("a@x.com").is_ok());
        assert_eq!(require_email("nope").unwrap_err().to_string(), "Invalid email");
    }
}
