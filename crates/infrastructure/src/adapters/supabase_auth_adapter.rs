//! Auth provider adapter - Implements AuthProviderPort using integration_supabase
//!
//! Owns the provider session (access and refresh token). The session is
//! kept in memory, mirrored to its own storage key, restored on demand and
//! refreshed shortly before it expires. Every session change is published
//! as an [`AuthEvent`].

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{AuthEvent, AuthProviderPort, KeyValueStorePort, OAuthProvider};
use async_trait::async_trait;
use chrono::Utc;
use domain::{EmailAddress, Password, UserId, UserIdentity};
use integration_supabase::{
    AuthClient, Session, SignUpResponse, SupabaseAuthClient, SupabaseConfig, SupabaseError, User,
};
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Storage key for the provider session
pub const SESSION_STORAGE_KEY: &str = "sb-auth-token";

/// Refresh this many seconds before the access token expires
const REFRESH_LEEWAY_SECS: i64 = 60;

const EVENT_CAPACITY: usize = 16;

/// Adapter for the auth-as-a-service provider
pub struct SupabaseAuthAdapter {
    client: Arc<dyn AuthClient>,
    storage: Arc<dyn KeyValueStorePort>,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
    reset_redirect_url: String,
    oauth_redirect_url: String,
}

impl std::fmt::Debug for SupabaseAuthAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseAuthAdapter")
            .field("client", &"SupabaseAuthClient")
            .field("has_session", &self.session.read().is_some())
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

/// Map integration auth error to application error
fn map_error(err: SupabaseError) -> ApplicationError {
    match err {
        SupabaseError::Api { message, .. } => ApplicationError::Auth(message),
        SupabaseError::Timeout { timeout_secs } => ApplicationError::Timeout { timeout_secs },
        SupabaseError::ConnectionFailed(e) => ApplicationError::ExternalService(e),
        SupabaseError::ParseError(e) => {
            ApplicationError::ExternalService(format!("malformed auth response: {e}"))
        },
        SupabaseError::ConfigurationError(e) => ApplicationError::Configuration(e),
    }
}

/// Convert a provider account to a domain identity
///
/// An email the domain rejects is dropped rather than failing the sign-in.
fn to_identity(user: &User) -> Result<UserIdentity, ApplicationError> {
    let id = UserId::parse(&user.id)?;
    let email = user
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .and_then(|e| EmailAddress::new(e).ok());
    Ok(UserIdentity { id, email })
}

impl SupabaseAuthAdapter {
    /// Create an adapter backed by the auth REST API
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: &SupabaseConfig,
        storage: Arc<dyn KeyValueStorePort>,
    ) -> Result<Self, ApplicationError> {
        let client = SupabaseAuthClient::new(config).map_err(map_error)?;
        Ok(Self::with_client(
            Arc::new(client),
            storage,
            config.reset_redirect_url.clone(),
            config.oauth_redirect_url.clone(),
        ))
    }

    /// Create an adapter from an existing client
    #[must_use]
    pub fn with_client(
        client: Arc<dyn AuthClient>,
        storage: Arc<dyn KeyValueStorePort>,
        reset_redirect_url: String,
        oauth_redirect_url: String,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            storage,
            session: RwLock::new(None),
            events,
            reset_redirect_url,
            oauth_redirect_url,
        }
    }

    fn publish(&self, event: AuthEvent) {
        debug!(?event, "Publishing auth event");
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    async fn store_session(&self, session: Session) {
        match serde_json::to_string(&session) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(SESSION_STORAGE_KEY, &raw).await {
                    warn!(error = %e, "Failed to persist provider session");
                }
            },
            Err(e) => warn!(error = %e, "Failed to encode provider session"),
        }
        *self.session.write() = Some(session);
    }

    async fn drop_session(&self) {
        self.session.write().take();
        if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY).await {
            warn!(error = %e, "Failed to remove provider session");
        }
    }

    /// In-memory session, else the persisted one
    async fn load_session(&self) -> Option<Session> {
        if let Some(session) = self.session.read().clone() {
            return Some(session);
        }

        let raw = match self.storage.get(SESSION_STORAGE_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read provider session");
                return None;
            },
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                *self.session.write() = Some(session.clone());
                Some(session)
            },
            Err(e) => {
                warn!(error = %e, "Discarding malformed provider session");
                None
            },
        }
    }
}

#[async_trait]
impl AuthProviderPort for SupabaseAuthAdapter {
    #[instrument(skip(self))]
    async fn current_user(&self) -> Result<Option<UserIdentity>, ApplicationError> {
        let Some(session) = self.load_session().await else {
            return Ok(None);
        };

        if !session.is_expired(Utc::now(), REFRESH_LEEWAY_SECS) {
            return to_identity(&session.user).map(Some);
        }

        debug!("Access token expired, refreshing");
        match self.client.refresh_session(&session.refresh_token).await {
            Ok(fresh) => {
                let identity = to_identity(&fresh.user)?;
                self.store_session(fresh).await;
                self.publish(AuthEvent::TokenRefreshed(identity.clone()));
                Ok(Some(identity))
            },
            Err(SupabaseError::Api { status, message }) if (400..500).contains(&status) => {
                info!(%message, "Stored session is no longer valid");
                self.drop_session().await;
                self.publish(AuthEvent::SignedOut);
                Ok(None)
            },
            Err(e) => Err(map_error(e)),
        }
    }

    #[instrument(skip_all, fields(email = %email.masked()))]
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &Password,
    ) -> Result<Option<UserIdentity>, ApplicationError> {
        let response = self
            .client
            .sign_up(email.as_str(), password.expose())
            .await
            .map_err(map_error)?;

        match response {
            SignUpResponse::Session(session) => {
                let identity = to_identity(&session.user)?;
                self.store_session(session).await;
                self.publish(AuthEvent::SignedIn(identity.clone()));
                Ok(Some(identity))
            },
            SignUpResponse::User(user) => {
                debug!(user = %user.id, "Confirmation email sent");
                Ok(None)
            },
        }
    }

    #[instrument(skip_all, fields(email = %email.masked()))]
    async fn sign_in_with_password(
        &self,
        email: &EmailAddress,
        password: &Password,
    ) -> Result<UserIdentity, ApplicationError> {
        let session = self
            .client
            .sign_in_with_password(email.as_str(), password.expose())
            .await
            .map_err(map_error)?;
        let identity = to_identity(&session.user)?;
        self.store_session(session).await;
        self.publish(AuthEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    fn oauth_authorize_url(&self, provider: OAuthProvider) -> Result<String, ApplicationError> {
        self.client
            .authorize_url(provider.as_str(), &self.oauth_redirect_url)
            .map_err(map_error)
    }

    #[instrument(skip_all, fields(email = %email.masked()))]
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), ApplicationError> {
        self.client
            .recover(email.as_str(), &self.reset_redirect_url)
            .await
            .map_err(map_error)
    }

    #[instrument(skip_all)]
    async fn confirm_password_reset(
        &self,
        recovery_token: &SecretString,
        password: &Password,
    ) -> Result<UserIdentity, ApplicationError> {
        let user = self
            .client
            .update_password(recovery_token.expose_secret(), password.expose())
            .await
            .map_err(map_error)?;
        let identity = to_identity(&user)?;
        // a recovery token is not a sign-in; only an existing session sees the update
        if self.session.read().is_some() {
            self.publish(AuthEvent::UserUpdated(identity.clone()));
        }
        Ok(identity)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), ApplicationError> {
        let session = self.load_session().await;
        self.drop_session().await;
        self.publish(AuthEvent::SignedOut);

        let Some(session) = session else {
            return Ok(());
        };
        match self.client.sign_out(&session.access_token).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unauthorized() => {
                debug!("Session was already revoked");
                Ok(())
            },
            Err(e) => Err(map_error(e)),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_become_auth_messages() {
        let err = map_error(SupabaseError::Api {
            status: 400,
            message: "Invalid login credentials".into(),
        });
        assert!(matches!(err, ApplicationError::Auth(ref m) if m == "Invalid login credentials"));
    }

    #[test]
    fn timeouts_are_preserved() {
        assert!(matches!(
            map_error(SupabaseError::Timeout { timeout_secs: 10 }),
            ApplicationError::Timeout { timeout_secs: 10 }
        ));
    }

    #[test]
    fn identity_drops_unusable_email() {
        let user = User {
            id: "8d0fd2b3-9ca7-4d9e-a95f-9e13dded2e67".into(),
            email: Some(String::new()),
            email_confirmed_at: None,
            confirmation_sent_at: None,
        };
        let identity = to_identity(&user).unwrap();
        assert!(identity.email.is_none());
    }

    #[test]
    fn identity_requires_uuid() {
        let user = User {
            id: "not-a-uuid".into(),
            email: None,
            email_confirmed_at: None,
            confirmation_sent_at: None,
        };
        assert!(to_identity(&user).is_err());
    }
}
