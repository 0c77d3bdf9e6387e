//! Per-field validation rules.
//!
//! Validation failures are local and recoverable: the
//! [`Collector`](crate::Collector) reports them to the user and asks again.
//! They never reach the process exit path.
//!
//! # Examples
//!
//! ```
//! use cadastro_core::*;
//!
//! assert_eq!(validate_name("  Alice ").unwrap(), "Alice");
//! assert_eq!(parse_age("30").unwrap(), 30);
//! assert!(matches!(parse_age("abc"), Err(ValidationError::InvalidAge(_))));
//! ```

use thiserror::Error;

/// Recoverable input errors.
///
/// The `Display` impl is the message shown to the user before the prompt
/// is repeated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name is empty or whitespace-only.
    #[error("Invalid name. Try again.")]
    EmptyName,
    /// Age is not a non-negative base-10 integer.
    #[error("Could not read age '{0}'. Try again.")]
    InvalidAge(String),
    /// CPF entry contained no digits.
    #[error("CPF must contain digits. Try again.")]
    EmptyNationalId,
    /// Entry was not valid UTF-8.
    #[error("Input is not valid UTF-8. Try again.")]
    InvalidEncoding,
    /// Canonical CPF already present in storage.
    #[error("CPF {0} is already registered. Try again.")]
    DuplicateNationalId(String),
}

/// Validates a name entry, returning it trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] if nothing remains after trimming.
pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

/// Parses an age entry as a base-10 unsigned integer.
///
/// Surrounding whitespace is ignored. Signs, fractions, and values above
/// `u32::MAX` are rejected.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAge`] carrying the offending entry.
pub fn parse_age(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    // `u32::from_str` accepts a leading '+'; ages are digits only.
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAge(trimmed.to_string()));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidAge(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("Alice").unwrap(), "Alice");
        assert_eq!(validate_name("  Ana Maria \t").unwrap(), "Ana Maria");
    }

    #[test]
    fn test_validate_name_rejects_blank() {
        assert_eq!(validate_name(""), Err(ValidationError::EmptyName));
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_parse_age_accepts_digits() {
        assert_eq!(parse_age("0").unwrap(), 0);
        assert_eq!(parse_age(" 42 ").unwrap(), 42);
        assert_eq!(parse_age("007").unwrap(), 7);
    }

    #[test]
    fn test_parse_age_rejects_non_numeric() {
        assert!(parse_age("abc").is_err());
        assert!(parse_age("").is_err());
        assert!(parse_age("3.5").is_err());
        assert!(parse_age("30 anos").is_err());
    }

    #[test]
    fn test_parse_age_rejects_signs() {
        assert_eq!(parse_age("-1"), Err(ValidationError::InvalidAge("-1".into())));
        assert!(parse_age("+30").is_err());
    }

    #[test]
    fn test_parse_age_rejects_overflow() {
        assert!(parse_age("99999999999").is_err());
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::EmptyName.to_string(), "Invalid name. Try again.");
        assert_eq!(
            ValidationError::DuplicateNationalId("111".into()).to_string(),
            "CPF 111 is already registered. Try again."
        );
    }
}
