//! Geolocation configuration

use std::time::Duration;

use application::PositionOptions;
use domain::Coordinate;
use serde::{Deserialize, Serialize};

use super::default_true;

/// A fixed position (inline table: `{ latitude = 37.5665, longitude = 126.978 }`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPositionConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
    /// Accuracy radius in meters
    #[serde(default)]
    pub accuracy_meters: Option<f64>,
}

impl FixedPositionConfig {
    /// Convert to a domain coordinate
    ///
    /// Returns `None` if the coordinates are invalid.
    #[must_use]
    pub fn to_coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.latitude, self.longitude).ok()
    }
}

/// Geolocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationAppConfig {
    /// Position request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum age of a reused fix in seconds
    #[serde(default = "default_maximum_age_secs")]
    pub maximum_age_secs: u64,

    /// Prefer a precise fix
    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Position reported by the static provider
    #[serde(default)]
    pub fixed_position: Option<FixedPositionConfig>,
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_maximum_age_secs() -> u64 {
    60
}

impl Default for GeolocationAppConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            maximum_age_secs: default_maximum_age_secs(),
            high_accuracy: true,
            fixed_position: None,
        }
    }
}

impl GeolocationAppConfig {
    /// Options for position requests
    #[must_use]
    pub const fn to_position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_secs(self.timeout_secs),
            maximum_age: Duration::from_secs(self.maximum_age_secs),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if let Some(fixed) = &self.fixed_position {
            if fixed.to_coordinate().is_none() {
                return Err(format!(
                    "fixed_position ({}, {}) is out of range",
                    fixed.latitude, fixed.longitude
                ));
            }
        }
        Ok(())
    }
}
