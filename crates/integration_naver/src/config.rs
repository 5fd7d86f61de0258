//! Naver API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Unit of the `duration` field in directions summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Durations are reported in seconds
    #[default]
    Seconds,
    /// Durations are reported in milliseconds
    Milliseconds,
}

impl DurationUnit {
    /// Convert a raw provider duration to whole seconds, rounding to nearest
    #[must_use]
    pub const fn to_seconds(self, raw: u64) -> u64 {
        match self {
            Self::Seconds => raw,
            Self::Milliseconds => raw.saturating_add(500) / 1000,
        }
    }
}

/// A client-id / client-secret pair
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Public client or key id
    #[serde(default)]
    pub id: String,

    /// Secret (never serialized)
    #[serde(default = "empty_secret", skip_serializing)]
    pub secret: SecretString,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            id: String::new(),
            secret: empty_secret(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Create a credential pair
    #[must_use]
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// Whether both halves are present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.secret.expose_secret().is_empty()
    }
}

/// Configuration for the Naver API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaverConfig {
    /// Base URL of the search API host
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,

    /// Base URL of the geocoding API host
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,

    /// Base URL of the directions API host
    #[serde(default = "default_directions_base_url")]
    pub directions_base_url: String,

    /// Credentials for local and blog search
    #[serde(default)]
    pub search: Credentials,

    /// Credentials for geocoding
    #[serde(default)]
    pub geocode: Credentials,

    /// Credentials for directions
    #[serde(default)]
    pub directions: Credentials,

    /// Number of results per search (1-5 for local search)
    #[serde(default = "default_display")]
    pub display: u8,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Geocoding cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_geocode_cache_ttl_minutes")]
    pub geocode_cache_ttl_minutes: u32,

    /// Directions route option (`traoptimal`, `trafast`, ...)
    #[serde(default = "default_route_option")]
    pub route_option: String,

    /// Unit of the directions `duration` field
    #[serde(default)]
    pub duration_unit: DurationUnit,
}

fn default_search_base_url() -> String {
    "https://openapi.naver.com".to_string()
}

fn default_geocode_base_url() -> String {
    "https://naveropenapi.apigw.ntruss.com".to_string()
}

fn default_directions_base_url() -> String {
    "https://maps.apigw.ntruss.com".to_string()
}

const fn default_display() -> u8 {
    5
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_geocode_cache_ttl_minutes() -> u32 {
    60
}

fn default_route_option() -> String {
    "traoptimal".to_string()
}

impl Default for NaverConfig {
    fn default() -> Self {
        Self {
            search_base_url: default_search_base_url(),
            geocode_base_url: default_geocode_base_url(),
            directions_base_url: default_directions_base_url(),
            search: Credentials::default(),
            geocode: Credentials::default(),
            directions: Credentials::default(),
            display: default_display(),
            timeout_secs: default_timeout_secs(),
            geocode_cache_ttl_minutes: default_geocode_cache_ttl_minutes(),
            route_option: default_route_option(),
            duration_unit: DurationUnit::default(),
        }
    }
}

impl NaverConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            search: Credentials::new("search-id", "search-secret"),
            geocode: Credentials::new("geocode-id", "geocode-secret"),
            directions: Credentials::new("directions-id", "directions-secret"),
            timeout_secs: 5,
            geocode_cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Point every client at one host (mock servers, reverse proxies)
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        self.search_base_url.clone_from(&base);
        self.geocode_base_url.clone_from(&base);
        self.directions_base_url = base;
        self
    }

    /// Check if geocode caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.geocode_cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [
            ("search_base_url", &self.search_base_url),
            ("geocode_base_url", &self.geocode_base_url),
            ("directions_base_url", &self.directions_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("{name} must be an http(s) URL"));
            }
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if !(1..=100).contains(&self.display) {
            return Err("display must be between 1 and 100".to_string());
        }

        if self.route_option.is_empty() {
            return Err("route_option must not be empty".to_string());
        }

        Ok(())
    }
}
