//! Auth REST client (`/auth/v1`)

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, Url};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::SupabaseConfig;
use crate::error::SupabaseError;
use crate::models::{
    EmailOnly, EmailPassword, PasswordOnly, RefreshToken, Session, SignUpResponse, User,
};

/// Trait for auth API clients
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Register an account
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, SupabaseError>;

    /// Password grant
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SupabaseError>;

    /// Refresh-token grant
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, SupabaseError>;

    /// Send a password-recovery email linking to `redirect_to`
    async fn recover(&self, email: &str, redirect_to: &str) -> Result<(), SupabaseError>;

    /// Change the password of the account behind `access_token`
    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<User, SupabaseError>;

    /// Look up the account behind `access_token`
    async fn get_user(&self, access_token: &str) -> Result<User, SupabaseError>;

    /// Revoke the session behind `access_token`
    async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError>;

    /// URL that starts a third-party sign-in
    fn authorize_url(&self, provider: &str, redirect_to: &str) -> Result<String, SupabaseError>;
}

/// GoTrue REST client
#[derive(Debug)]
pub struct SupabaseAuthClient {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseAuthClient {
    /// Create a new auth client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        config.validate().map_err(SupabaseError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SupabaseError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.auth_url())
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", self.config.anon_key.expose_secret())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SupabaseError> {
        let response = self.with_key(request).send().await.map_err(|e| {
            if e.is_timeout() {
                SupabaseError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                SupabaseError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        warn!(status = status.as_u16(), %message, "Auth API error");
        Err(SupabaseError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SupabaseError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| SupabaseError::ParseError(e.to_string()))
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: &(impl serde::Serialize + Sync),
    ) -> Result<Session, SupabaseError> {
        let request = self
            .client
            .post(self.endpoint("/token"))
            .query(&[("grant_type", grant_type)])
            .json(body);
        let mut session: Session = self.json(request).await?;
        if session.expires_at.is_none() {
            session.expires_at = Some(session.expires_at_or(Utc::now()).timestamp());
        }
        Ok(session)
    }
}

/// First non-empty message field of an error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[async_trait]
impl AuthClient for SupabaseAuthClient {
    #[instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, SupabaseError> {
        let request = self
            .client
            .post(self.endpoint("/signup"))
            .json(&EmailPassword { email, password });
        let response: SignUpResponse = self.json(request).await?;
        debug!(user = %response.user().id, "Account created");
        Ok(response)
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SupabaseError> {
        self.token_grant("password", &EmailPassword { email, password })
            .await
    }

    #[instrument(skip_all)]
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, SupabaseError> {
        self.token_grant("refresh_token", &RefreshToken { refresh_token })
            .await
    }

    #[instrument(skip(self))]
    async fn recover(&self, email: &str, redirect_to: &str) -> Result<(), SupabaseError> {
        let request = self
            .client
            .post(self.endpoint("/recover"))
            .query(&[("redirect_to", redirect_to)])
            .json(&EmailOnly { email });
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<User, SupabaseError> {
        let request = self
            .client
            .put(self.endpoint("/user"))
            .bearer_auth(access_token)
            .json(&PasswordOnly { password });
        self.json(request).await
    }

    #[instrument(skip_all)]
    async fn get_user(&self, access_token: &str) -> Result<User, SupabaseError> {
        let request = self.client.get(self.endpoint("/user")).bearer_auth(access_token);
        self.json(request).await
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let request = self
            .client
            .post(self.endpoint("/logout"))
            .bearer_auth(access_token);
        self.send(request).await?;
        Ok(())
    }

    fn authorize_url(&self, provider: &str, redirect_to: &str) -> Result<String, SupabaseError> {
        Url::parse_with_params(
            &self.endpoint("/authorize"),
            &[("provider", provider), ("redirect_to", redirect_to)],
        )
        .map(String::from)
        .map_err(|e| SupabaseError::ConfigurationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_precedence() {
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            error_message(r#"{"code":422,"msg":"User already registered"}"#).as_deref(),
            Some("User already registered")
        );
        assert_eq!(
            error_message(r#"{"message":"Invalid API key"}"#).as_deref(),
            Some("Invalid API key")
        );
        assert_eq!(error_message("not json"), None);
    }

    #[test]
    fn authorize_url_encodes_redirect() {
        let client =
            SupabaseAuthClient::new(&SupabaseConfig::for_testing("https://abc.supabase.co")).unwrap();
        let url = client
            .authorize_url("kakao", "http://localhost:5173/")
            .unwrap();
        assert_eq!(
            url,
            "https://abc.supabase.co/auth/v1/authorize?provider=kakao&redirect_to=http%3A%2F%2Flocalhost%3A5173%2F"
        );
    }

    #[test]
    fn rejects_unconfigured_project() {
        assert!(matches!(
            SupabaseAuthClient::new(&SupabaseConfig::default()),
            Err(SupabaseError::ConfigurationError(_))
        ));
    }
}
