//! Email address value object
//!
//! Sign-up, sign-in and password-reset forms all key on an email address.
//! Validation happens here so the auth provider only ever sees well-formed input.
//!
//! ```
//! use domain::EmailAddress;
//!
//! let email = EmailAddress::new(" Foodie@Example.COM ").unwrap();
//! assert_eq!(email.as_str(), "foodie@example.com");
//! assert!(EmailAddress::new("foodie").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;

/// A validated, lower-cased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress {
    #[validate(email)]
    value: String,
}

impl EmailAddress {
    /// Create a new email address, validating the format
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmailAddress` if the format is invalid.
    pub fn new(email: impl Into<String>) -> Result<Self, DomainError> {
        let raw = email.into();
        let candidate = Self {
            value: raw.trim().to_lowercase(),
        };
        candidate
            .validate()
            .map_err(|_| DomainError::InvalidEmailAddress(raw))?;
        Ok(candidate)
    }

    /// Get the email address as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Masked form for log output (`f****@example.com`)
    #[must_use]
    pub fn masked(&self) -> String {
        let (local, domain) = self.value.split_once('@').unwrap_or((&self.value, ""));
        let first = local.chars().next().unwrap_or('*');
        format!("{first}****@{domain}")
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_is_normalized() {
        let email = EmailAddress::new("  User@Example.COM").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn invalid_email_is_rejected() {
        assert!(EmailAddress::new("not-an-email").is_err());
        assert!(EmailAddress::new("@nodomain.com").is_err());
        assert!(EmailAddress::new("").is_err());
    }

    #[test]
    fn error_keeps_original_input() {
        let err = EmailAddress::new("broken").unwrap_err();
        assert_eq!(err.to_string(), "Invalid email address: broken");
    }

    #[test]
    fn masked_hides_local_part() {
        let email = EmailAddress::new("foodie@example.com").unwrap();
        assert_eq!(email.masked(), "f****@example.com");
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<EmailAddress, _> = serde_json::from_str(r#""a@b.com""#);
        assert!(ok.is_ok());
        let bad: Result<EmailAddress, _> = serde_json::from_str(r#""nope""#);
        assert!(bad.is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let email = EmailAddress::new("a@b.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), r#""a@b.com""#);
    }
}
