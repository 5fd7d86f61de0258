//! Authenticated-user session state

use serde::{Deserialize, Serialize};

use crate::value_objects::{EmailAddress, UserId};

/// The signed-in account as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Provider-assigned account id
    pub id: UserId,
    /// Account email, absent for some OAuth accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,
}

/// Current authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Signed-in user, if any
    pub user: Option<UserIdentity>,
    /// Whether a user is signed in
    pub is_authenticated: bool,
}

impl AuthSession {
    /// Session for a signed-in user
    #[must_use]
    pub const fn signed_in(user: UserIdentity) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    /// Session with nobody signed in
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            user: None,
            is_authenticated: false,
        }
    }

    /// Email of the signed-in user
    #[must_use]
    pub fn email(&self) -> Option<&EmailAddress> {
        self.user.as_ref().and_then(|u| u.email.as_ref())
    }

    /// The shape written to persistent storage
    #[must_use]
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            email: self.email().map(ToString::to_string).unwrap_or_default(),
            is_authenticated: self.is_authenticated,
        }
    }
}

/// What survives a reload: never a password or token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    /// Email of the last signed-in user (empty when unknown)
    #[serde(default)]
    pub email: String,
    /// Whether the user was signed in
    #[serde(default)]
    pub is_authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserIdentity {
        UserIdentity {
            id: UserId::parse("8d0fd2b3-9ca7-4d9e-a95f-9e13dded2e67").unwrap(),
            email: Some(EmailAddress::new("foodie@example.com").unwrap()),
        }
    }

    #[test]
    fn default_is_signed_out() {
        assert_eq!(AuthSession::default(), AuthSession::signed_out());
    }

    #[test]
    fn persisted_shape_keeps_only_email_and_flag() {
        let session = AuthSession::signed_in(user());
        let json = serde_json::to_value(session.to_persisted()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "foodie@example.com", "isAuthenticated": true})
        );
    }

    #[test]
    fn signed_out_persists_empty_email() {
        let persisted = AuthSession::signed_out().to_persisted();
        assert!(persisted.email.is_empty());
        assert!(!persisted.is_authenticated);
    }
}
