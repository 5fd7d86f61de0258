//! Application configuration
//!
//! Layered: built-in defaults, then an optional `config.toml`, then
//! environment variables prefixed with `PLACEFINDER_` using `__` between
//! nested keys (`PLACEFINDER_NAVER__SEARCH__ID`).
//!
//! Split into focused sub-modules:
//! - `map`: map widget defaults and toolkit polling
//! - `geolocation`: position request options and the static provider
//! - `storage`: local storage directory

mod geolocation;
mod map;
mod storage;

use std::path::Path;

use integration_naver::NaverConfig;
use integration_supabase::SupabaseConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use geolocation::{FixedPositionConfig, GeolocationAppConfig};
pub use map::MapAppConfig;
pub use storage::StorageConfig;

use crate::telemetry::TelemetryConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PLACEFINDER";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search, geocoding and directions APIs
    #[serde(default)]
    pub naver: NaverConfig,

    /// Auth provider
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// Map widget
    #[serde(default)]
    pub map: MapAppConfig,

    /// Position requests
    #[serde(default)]
    pub geolocation: GeolocationAppConfig,

    /// Local storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default `config.toml`
    ///
    /// An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: Self = config.try_deserialize()?;
        debug!(?path, "Configuration loaded");
        Ok(app)
    }

    /// Validate every section, collecting all problems
    ///
    /// The auth section is only checked once a project URL is set.
    ///
    /// # Errors
    ///
    /// Returns one message per problem, prefixed with its section.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        let mut check = |section: &str, result: Result<(), String>| {
            if let Err(e) = result {
                problems.push(format!("{section}: {e}"));
            }
        };

        check("naver", self.naver.validate());
        if !self.supabase.url.is_empty() {
            check("supabase", self.supabase.validate());
        }
        check("map", self.map.validate());
        check("geolocation", self.geolocation.validate());

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}
