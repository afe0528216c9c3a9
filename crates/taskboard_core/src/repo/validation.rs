//! Field validation shared by task and user repositories.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Caller-supplied data violates a field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    MissingCategory,
    MissingStatus,
    EmptyName,
    EmptyEmail,
    InvalidEmail(String),
    DuplicateEmail(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::MissingCategory => write!(f, "task category is required"),
            Self::MissingStatus => write!(f, "task status is required"),
            Self::EmptyName => write!(f, "user name cannot be empty"),
            Self::EmptyEmail => write!(f, "user email cannot be empty"),
            Self::InvalidEmail(email) => write!(f, "invalid email format: `{email}`"),
            Self::DuplicateEmail(email) => {
                write!(f, "a user with email `{email}` already exists")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it with `error` when nothing is left.
pub fn required_text(value: &str, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}

/// Basic `local@domain.tld` shape check. Expects trimmed input.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Case-insensitive equality used by filters and email uniqueness.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{eq_ignore_case, is_valid_email, required_text, ValidationError};

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(
            required_text("  Report ", ValidationError::EmptyTitle).unwrap(),
            "Report"
        );
        assert_eq!(
            required_text(" \t ", ValidationError::EmptyTitle).unwrap_err(),
            ValidationError::EmptyTitle
        );
    }

    #[test]
    fn email_shape_requires_at_and_dotted_domain() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("ax.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@@x.com"));
    }

    #[test]
    fn case_insensitive_compare() {
        assert!(eq_ignore_case("A@X.com", "a@x.COM"));
        assert!(!eq_ignore_case("work", "works"));
    }
}
