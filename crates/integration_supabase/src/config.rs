//! Auth API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Configuration for the auth API client
#[derive(Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL (`https://<project>.supabase.co`)
    #[serde(default)]
    pub url: String,

    /// Public anon key, sent as `apikey` on every request
    #[serde(default = "empty_secret", skip_serializing)]
    pub anon_key: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page the password-reset email links to
    #[serde(default = "default_reset_redirect_url")]
    pub reset_redirect_url: String,

    /// Page the OAuth flow returns to
    #[serde(default = "default_oauth_redirect_url")]
    pub oauth_redirect_url: String,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_reset_redirect_url() -> String {
    "http://localhost:5173/reset-pw".to_string()
}

fn default_oauth_redirect_url() -> String {
    "http://localhost:5173".to_string()
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("reset_redirect_url", &self.reset_redirect_url)
            .field("oauth_redirect_url", &self.oauth_redirect_url)
            .finish()
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: empty_secret(),
            timeout_secs: default_timeout_secs(),
            reset_redirect_url: default_reset_redirect_url(),
            oauth_redirect_url: default_oauth_redirect_url(),
        }
    }
}

impl SupabaseConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: SecretString::from("anon-key".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Base of the auth REST API
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url.trim_end_matches('/'))
    }

    /// Whether URL and anon key are set
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.expose_secret().is_empty()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err("url must be an http(s) URL".to_string());
        }

        if self.anon_key.expose_secret().is_empty() {
            return Err("anon_key must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_project() {
        let config = SupabaseConfig::default();
        assert!(!config.is_configured());
        assert!(config.validate().is_err());
        assert_eq!(config.reset_redirect_url, "http://localhost:5173/reset-pw");
    }

    #[test]
    fn auth_url_trims_slash() {
        let config = SupabaseConfig::for_testing("https://abc.supabase.co/");
        assert_eq!(config.auth_url(), "https://abc.supabase.co/auth/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_redacts_key() {
        let config = SupabaseConfig::for_testing("https://abc.supabase.co");
        assert!(!format!("{config:?}").contains("anon-key"));
    }
}
