//! Device geolocation port

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A position fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Where the device is
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
    /// When the fix was taken
    pub timestamp: DateTime<Utc>,
}

/// Options for a position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Prefer a precise fix over a fast one
    pub high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// Accept a cached fix no older than this
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// Port for obtaining the user's position
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeolocationPort: Send + Sync {
    /// Obtain a fresh position fix
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = PositionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }
}
