//! Authentication state store
//!
//! Holds the signed-in user, mirrors it to the `auth-storage` key, and turns
//! provider errors into the messages the auth pages show. Every operation
//! returns an [`AuthOutcome`] rather than an error so callers can render the
//! message directly.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use domain::{AuthSession, EmailAddress, Password, PersistedSession, UserIdentity};
use parking_lot::{Mutex, RwLock};
use secrecy::SecretString;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{AuthEvent, AuthProviderPort, KeyValueStorePort, OAuthProvider};

/// Storage key for the persisted session
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Storage key for the time the last reset email was sent
pub const PASSWORD_RESET_SENT_KEY: &str = "password-reset-sent-at";

/// Minimum gap between two password-reset emails
pub const PASSWORD_RESET_COOLDOWN: Duration = Duration::from_secs(60);

/// Result of an auth operation: success, or a message for the user
pub type AuthOutcome<T = ()> = Result<T, String>;

/// First step of the two-step sign-up form
#[derive(Debug, Clone)]
struct SignUpDraft {
    email: EmailAddress,
}

/// Authentication state shared by the auth pages
pub struct AuthStore {
    provider: Arc<dyn AuthProviderPort>,
    storage: Arc<dyn KeyValueStorePort>,
    session: RwLock<AuthSession>,
    draft: Mutex<Option<SignUpDraft>>,
    reset_sent_at: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("session", &*self.session.read())
            .field("sign_up_pending", &self.draft.lock().is_some())
            .finish_non_exhaustive()
    }
}

fn message(err: ApplicationError) -> String {
    match err {
        ApplicationError::Auth(msg) | ApplicationError::Validation(msg) => msg,
        ApplicationError::Domain(e) => e.to_string(),
        other => other.to_string(),
    }
}

fn parse_email(email: &str) -> AuthOutcome<EmailAddress> {
    EmailAddress::new(email).map_err(|e| e.to_string())
}

impl AuthStore {
    /// Create a store with nobody signed in
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProviderPort>, storage: Arc<dyn KeyValueStorePort>) -> Self {
        Self {
            provider,
            storage,
            session: RwLock::new(AuthSession::signed_out()),
            draft: Mutex::new(None),
            reset_sent_at: Mutex::new(None),
        }
    }

    /// Snapshot of the current session
    #[must_use]
    pub fn session(&self) -> AuthSession {
        self.session.read().clone()
    }

    /// Whether a user is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated
    }

    /// Email entered on the first sign-up step, if that step is done
    #[must_use]
    pub fn pending_sign_up_email(&self) -> Option<EmailAddress> {
        self.draft.lock().as_ref().map(|d| d.email.clone())
    }

    /// Read the persisted session and reconcile it with the provider
    ///
    /// A provider session wins. A persisted "signed in" flag without a
    /// provider session is stale and gets cleared.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> AuthSession {
        let persisted = self.load_persisted().await;

        match self.provider.current_user().await {
            Ok(Some(user)) => {
                info!("Restored provider session");
                self.set_user(user).await;
            },
            Ok(None) if persisted.is_authenticated => {
                info!("Persisted session has no provider session, clearing");
                self.clear_user().await;
            },
            Ok(None) => {},
            Err(e) => warn!(error = %e, "Could not restore provider session"),
        }

        self.session()
    }

    /// Validate the email and remember it for [`Self::complete_sign_up`]
    pub fn begin_sign_up(&self, email: &str) -> AuthOutcome {
        let email = parse_email(email)?;
        *self.draft.lock() = Some(SignUpDraft { email });
        Ok(())
    }

    /// Second sign-up step: password plus confirmation
    ///
    /// The draft is discarded on success. On failure it is kept so the user
    /// can retry the password step.
    #[instrument(skip_all)]
    pub async fn complete_sign_up(&self, password: &str, confirmation: &str) -> AuthOutcome {
        let email = self
            .pending_sign_up_email()
            .ok_or_else(|| "enter an email address first".to_string())?;
        let password = Password::confirm(password, confirmation).map_err(|e| e.to_string())?;

        self.register(&email, &password).await?;
        self.draft.lock().take();
        Ok(())
    }

    /// Single-step sign-up
    #[instrument(skip_all)]
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthOutcome {
        let email = parse_email(email)?;
        let password = Password::new(password).map_err(|e| e.to_string())?;
        self.register(&email, &password).await
    }

    async fn register(&self, email: &EmailAddress, password: &Password) -> AuthOutcome {
        match self.provider.sign_up(email, password).await.map_err(message)? {
            Some(user) => self.set_user(user).await,
            None => info!(email = %email.masked(), "Sign-up awaiting email confirmation"),
        }
        Ok(())
    }

    /// Sign in with email and password
    #[instrument(skip_all)]
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthOutcome {
        let email = parse_email(email)?;
        let password = Password::new(password).map_err(|e| e.to_string())?;

        let user = self
            .provider
            .sign_in_with_password(&email, &password)
            .await
            .map_err(message)?;
        info!(email = %email.masked(), "Signed in");
        self.set_user(user).await;
        Ok(())
    }

    /// URL to open for a third-party sign-in
    ///
    /// The session is picked up later through a provider event.
    pub fn sign_in_with_oauth(&self, provider: OAuthProvider) -> AuthOutcome<String> {
        self.provider.oauth_authorize_url(provider).map_err(message)
    }

    /// Send a password-reset email
    ///
    /// After a successful send, further requests are refused for
    /// [`PASSWORD_RESET_COOLDOWN`]. The send time is persisted so the
    /// cooldown also holds across restarts.
    #[instrument(skip_all)]
    pub async fn reset_password_request(&self, email: &str) -> AuthOutcome {
        let email = parse_email(email)?;
        if let Some(remaining) = self.reset_cooldown_remaining().await {
            let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            debug!(secs, "Password reset still cooling down");
            return Err(format!("Please try again in {secs} s"));
        }

        self.provider
            .request_password_reset(&email)
            .await
            .map_err(message)?;

        *self.reset_sent_at.lock() = Some(Instant::now());
        if let Err(e) = self
            .storage
            .set(PASSWORD_RESET_SENT_KEY, &Utc::now().to_rfc3339())
            .await
        {
            warn!(error = %e, "Failed to persist password reset time");
        }
        info!(email = %email.masked(), "Password reset email sent");
        Ok(())
    }

    async fn reset_cooldown_remaining(&self) -> Option<Duration> {
        let sent_at = *self.reset_sent_at.lock();
        let elapsed = match sent_at {
            Some(sent) => sent.elapsed(),
            None => self.persisted_reset_elapsed().await?,
        };
        PASSWORD_RESET_COOLDOWN
            .checked_sub(elapsed)
            .filter(|remaining| !remaining.is_zero())
    }

    async fn persisted_reset_elapsed(&self) -> Option<Duration> {
        let raw = match self.storage.get(PASSWORD_RESET_SENT_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read password reset time");
                return None;
            },
        };
        let sent = DateTime::parse_from_rfc3339(raw.trim())
            .inspect_err(|e| warn!(error = %e, "Ignoring malformed password reset time"))
            .ok()?;
        // A send time in the future counts as just sent.
        Some((Utc::now() - sent.with_timezone(&Utc)).to_std().unwrap_or_default())
    }

    /// Set a new password from a reset link
    ///
    /// The user is not signed in afterwards; they sign in with the new
    /// password.
    #[instrument(skip_all)]
    pub async fn reset_password_confirm(
        &self,
        recovery_token: &SecretString,
        password: &str,
        confirmation: &str,
    ) -> AuthOutcome {
        let password = Password::confirm(password, confirmation).map_err(|e| e.to_string())?;
        let user = self
            .provider
            .confirm_password_reset(recovery_token, &password)
            .await
            .map_err(message)?;
        debug!(user = %user.id, "Password updated");
        Ok(())
    }

    /// Sign out at the provider and locally
    ///
    /// Local state is cleared even if the provider call fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> AuthOutcome {
        let result = self.provider.sign_out().await.map_err(message);
        self.clear_user().await;
        result
    }

    /// Mark a user as signed in and persist it
    pub async fn set_user(&self, user: UserIdentity) {
        let persisted = {
            let mut session = self.session.write();
            *session = AuthSession::signed_in(user);
            session.to_persisted()
        };
        self.persist(&persisted).await;
    }

    /// Forget the signed-in user and any sign-up in progress
    pub async fn clear_user(&self) {
        *self.session.write() = AuthSession::signed_out();
        self.draft.lock().take();
        if let Err(e) = self.storage.remove(AUTH_STORAGE_KEY).await {
            warn!(error = %e, "Failed to remove persisted session");
        }
    }

    /// Apply provider session events to this store until the provider goes away
    pub fn spawn_event_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut events = self.provider.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => store.apply(event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Auth event listener lagged");
                    },
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Auth event listener stopped");
        })
    }

    async fn apply(&self, event: AuthEvent) {
        debug!(?event, "Auth event");
        match event {
            AuthEvent::SignedIn(user)
            | AuthEvent::UserUpdated(user)
            | AuthEvent::PasswordRecovery(user)
            | AuthEvent::TokenRefreshed(user) => self.set_user(user).await,
            AuthEvent::SignedOut => self.clear_user().await,
        }
    }

    async fn load_persisted(&self) -> PersistedSession {
        match self.storage.get(AUTH_STORAGE_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring malformed persisted session");
                PersistedSession::default()
            }),
            Ok(None) => PersistedSession::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                PersistedSession::default()
            },
        }
    }

    async fn persist(&self, persisted: &PersistedSession) {
        let raw = match serde_json::to_string(persisted) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to encode session");
                return;
            },
        };
        if let Err(e) = self.storage.set(AUTH_STORAGE_KEY, &raw).await {
            warn!(error = %e, "Failed to persist session");
        }
    }
}
