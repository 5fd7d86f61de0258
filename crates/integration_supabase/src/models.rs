//! Auth API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account as returned by the auth API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account UUID
    pub id: String,
    /// Email, absent for some OAuth identities
    #[serde(default)]
    pub email: Option<String>,
    /// When the email was confirmed
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// When a confirmation email was last sent
    #[serde(default)]
    pub confirmation_sent_at: Option<DateTime<Utc>>,
}

/// An issued session
///
/// Tokens are redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for user-scoped calls
    pub access_token: String,
    /// Token for `grant_type=refresh_token`
    pub refresh_token: String,
    /// Usually `bearer`
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: i64,
    /// Expiry as a Unix timestamp
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Signed-in account
    pub user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Expiry instant, from `expires_at` or `issued_at + expires_in`
    #[must_use]
    pub fn expires_at_or(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        self.expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(|| issued_at + chrono::Duration::seconds(self.expires_in))
    }

    /// Whether the access token expires within `leeway_secs` of `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, leeway_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|ts| ts - leeway_secs <= now.timestamp())
    }
}

/// Sign-up result
///
/// With email confirmation enabled the API returns the bare user; with
/// auto-confirm it returns a full session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    /// Account created and signed in
    Session(Session),
    /// Account created, confirmation email sent
    User(User),
}

impl SignUpResponse {
    /// The created account
    #[must_use]
    pub const fn user(&self) -> &User {
        match self {
            Self::Session(session) => &session.user,
            Self::User(user) => user,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailPassword<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshToken<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailOnly<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordOnly<'a> {
    pub password: &'a str,
}
