//! User identifier value object
//!
//! The auth provider assigns every account a UUID.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// Identifier of an account at the auth provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a user ID as issued by the provider
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the value is not a UUID.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::ValidationError(format!("invalid user id '{s}': {e}")))
    }

    /// Get the underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_uuid() {
        let id = UserId::parse("8d0fd2b3-9ca7-4d9e-a95f-9e13dded2e67").unwrap();
        assert_eq!(id.to_string(), "8d0fd2b3-9ca7-4d9e-a95f-9e13dded2e67");
    }

    #[test]
    fn rejects_non_uuid() {
        assert!(UserId::parse("user-1").is_err());
    }
}
