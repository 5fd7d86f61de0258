//! Subscriber setup

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (e.g. "info", "placefinder_cli=debug,infrastructure=info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit one JSON object per line instead of formatted text
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: false,
        }
    }
}

/// Telemetry initialization errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected directive
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to initialize telemetry: {0}")]
    Init(String),
}

fn build_filter(
    config: &TelemetryConfig,
    override_filter: Option<&str>,
) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = override_filter {
        return EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter {
            filter: filter.to_string(),
            reason: e.to_string(),
        });
    }

    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.log_filter).map_err(|e| TelemetryError::InvalidFilter {
            filter: config.log_filter.clone(),
            reason: e.to_string(),
        })
    })
}

/// Install the global subscriber
///
/// Filter precedence: `override_filter` (CLI verbosity), then `RUST_LOG`,
/// then `config.log_filter`.
///
/// # Errors
///
/// Returns an error for an unparsable filter or if a subscriber is already set.
pub fn init_telemetry(
    config: &TelemetryConfig,
    override_filter: Option<&str>,
) -> Result<(), TelemetryError> {
    let filter = build_filter(config, override_filter)?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(json = config.json, "Logging initialized");
    Ok(())
}
