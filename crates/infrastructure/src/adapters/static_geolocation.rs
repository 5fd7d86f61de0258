//! Fixed-position geolocation - Implements GeolocationPort from configuration
//!
//! A terminal has no location sensor; the position comes from config or
//! the command line instead.

use application::error::ApplicationError;
use application::ports::{GeolocationPort, Position, PositionOptions};
use async_trait::async_trait;
use chrono::Utc;
use domain::Coordinate;
use tracing::{debug, instrument};

/// Geolocation source that always reports the same position
#[derive(Debug, Clone, Default)]
pub struct StaticGeolocation {
    position: Option<Coordinate>,
    accuracy_meters: Option<f64>,
}

impl StaticGeolocation {
    /// Report `position` with the given accuracy
    #[must_use]
    pub const fn new(position: Coordinate, accuracy_meters: Option<f64>) -> Self {
        Self {
            position: Some(position),
            accuracy_meters,
        }
    }

    /// A source with no position; every request fails
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            position: None,
            accuracy_meters: None,
        }
    }
}

#[async_trait]
impl GeolocationPort for StaticGeolocation {
    #[instrument(skip(self))]
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, ApplicationError> {
        let coordinate = self.position.ok_or_else(|| {
            ApplicationError::ExternalService(
                "position unavailable: no fixed position configured".to_string(),
            )
        })?;
        debug!(%coordinate, "Reporting fixed position");
        Ok(Position {
            coordinate,
            accuracy_meters: self.accuracy_meters,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_configured_position() {
        let here = Coordinate::new(37.4979, 127.0276).unwrap();
        let source = StaticGeolocation::new(here, Some(25.0));
        let position = source
            .current_position(&PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(position.coordinate, here);
        assert_eq!(position.accuracy_meters, Some(25.0));
    }

    #[tokio::test]
    async fn unavailable_source_fails() {
        let err = StaticGeolocation::unavailable()
            .current_position(&PositionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(ref m) if m.contains("unavailable")));
    }
}
