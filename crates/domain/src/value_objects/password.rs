//! Password value object
//!
//! Passwords only ever live in memory for the duration of a single form
//! submission. They are wrapped in [`SecretString`] so they are zeroized on
//! drop and never show up in `Debug` output.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::DomainError;

/// A password that satisfies the minimum-length rule
#[derive(Clone)]
pub struct Password(SecretString);

impl Password {
    /// Minimum number of characters
    pub const MIN_LENGTH: usize = 8;

    /// Validate and wrap a password
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the password is shorter than
    /// [`Self::MIN_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.chars().count() < Self::MIN_LENGTH {
            return Err(DomainError::ValidationError(format!(
                "password must be at least {} characters",
                Self::MIN_LENGTH
            )));
        }
        Ok(Self(SecretString::from(value)))
    }

    /// Validate a password together with its confirmation field
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if either field is too short or
    /// the two do not match.
    pub fn confirm(password: &str, confirmation: &str) -> Result<Self, DomainError> {
        let password = Self::new(password)?;
        if password.expose() != confirmation {
            return Err(DomainError::ValidationError(
                "passwords do not match".to_string(),
            ));
        }
        Ok(password)
    }

    /// Borrow the plaintext, for handing to the auth provider only
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}
