//! Auth-as-a-service port
//!
//! The provider owns credentials and tokens. The application only sees the
//! resulting [`UserIdentity`] and the session-change events it publishes.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use domain::{EmailAddress, Password, UserIdentity};
#[cfg(test)]
use mockall::automock;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::ApplicationError;

/// Third-party identity providers offered on the sign-in page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google account
    Google,
    /// Kakao account
    Kakao,
    /// GitHub account
    Github,
}

impl OAuthProvider {
    /// Provider name as the auth service expects it
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Kakao => "kakao",
            Self::Github => "github",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "kakao" => Ok(Self::Kakao),
            "github" => Ok(Self::Github),
            other => Err(ApplicationError::Validation(format!(
                "unsupported OAuth provider '{other}'"
            ))),
        }
    }
}

/// Session-change notification from the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A user signed in (password, OAuth, or restored session)
    SignedIn(UserIdentity),
    /// The session ended
    SignedOut,
    /// Account details (e.g. password) changed
    UserUpdated(UserIdentity),
    /// A recovery link was opened; the user may now set a new password
    PasswordRecovery(UserIdentity),
    /// Access token was renewed
    TokenRefreshed(UserIdentity),
}

/// Port for the external auth provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthProviderPort: Send + Sync {
    /// Restore the provider session, if one exists and is still valid
    async fn current_user(&self) -> Result<Option<UserIdentity>, ApplicationError>;

    /// Register a new account
    ///
    /// Returns `None` when the provider requires email confirmation before
    /// the account can sign in.
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &Password,
    ) -> Result<Option<UserIdentity>, ApplicationError>;

    /// Sign in with email and password
    async fn sign_in_with_password(
        &self,
        email: &EmailAddress,
        password: &Password,
    ) -> Result<UserIdentity, ApplicationError>;

    /// URL the user must open to sign in with a third-party identity
    fn oauth_authorize_url(&self, provider: OAuthProvider) -> Result<String, ApplicationError>;

    /// Send a password-reset email
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), ApplicationError>;

    /// Set a new password using the token from the reset link
    async fn confirm_password_reset(
        &self,
        recovery_token: &SecretString,
        password: &Password,
    ) -> Result<UserIdentity, ApplicationError>;

    /// End the provider session
    async fn sign_out(&self) -> Result<(), ApplicationError>;

    /// Subscribe to session-change events
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parsing_is_case_insensitive() {
        assert_eq!("Google".parse::<OAuthProvider>().unwrap(), OAuthProvider::Google);
        assert_eq!("KAKAO".parse::<OAuthProvider>().unwrap(), OAuthProvider::Kakao);
    }

    #[test]
    fn unknown_provider_is_validation_error() {
        let err = "myspace".parse::<OAuthProvider>().unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
    }

    #[test]
    fn provider_display() {
        assert_eq!(OAuthProvider::Github.to_string(), "github");
    }
}
