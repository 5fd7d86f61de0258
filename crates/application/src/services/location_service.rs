//! Current-position lookup with timeout and fix caching

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{GeolocationPort, Position, PositionOptions};

/// Wraps a [`GeolocationPort`] with the page's position options
///
/// A fix younger than `maximum_age` is served from memory; a fresh request
/// that takes longer than `timeout` fails with `Timeout`.
pub struct LocationService {
    geolocation: Arc<dyn GeolocationPort>,
    options: PositionOptions,
    last_fix: Mutex<Option<(Position, Instant)>>,
}

impl std::fmt::Debug for LocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService")
            .field("options", &self.options)
            .field("has_fix", &self.last_fix.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl LocationService {
    /// Create a service with the given options
    #[must_use]
    pub fn new(geolocation: Arc<dyn GeolocationPort>, options: PositionOptions) -> Self {
        Self {
            geolocation,
            options,
            last_fix: Mutex::new(None),
        }
    }

    /// The options every request uses
    #[must_use]
    pub const fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Current position, possibly from cache
    ///
    /// # Errors
    ///
    /// `Timeout` if the provider does not answer within the configured
    /// timeout, or whatever the provider reports.
    #[instrument(skip(self))]
    pub async fn current_position(&self) -> Result<Position, ApplicationError> {
        if let Some(cached) = self.cached_fix() {
            debug!("Serving cached position");
            return Ok(cached);
        }

        let request = self.geolocation.current_position(&self.options);
        let position = tokio::time::timeout(self.options.timeout, request)
            .await
            .map_err(|_| {
                warn!(timeout = ?self.options.timeout, "Position request timed out");
                ApplicationError::Timeout {
                    timeout_secs: self.options.timeout.as_secs(),
                }
            })??;

        debug!(coordinate = %position.coordinate, accuracy = ?position.accuracy_meters, "Position acquired");
        *self.last_fix.lock() = Some((position.clone(), Instant::now()));
        Ok(position)
    }

    fn cached_fix(&self) -> Option<Position> {
        let guard = self.last_fix.lock();
        let (position, acquired) = guard.as_ref()?;
        (acquired.elapsed() <= self.options.maximum_age).then(|| position.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use domain::Coordinate;

    use super::*;
    use crate::ports::MockGeolocationPort;

    fn fix() -> Position {
        Position {
            coordinate: Coordinate::new(37.5665, 126.978).unwrap(),
            accuracy_meters: Some(12.0),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fix_is_cached_within_maximum_age() {
        let mut geo = MockGeolocationPort::new();
        geo.expect_current_position().times(1).returning(|_| Ok(fix()));
        let service = LocationService::new(Arc::new(geo), PositionOptions::default());

        let first = service.current_position().await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        let second = service.current_position().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_fix_is_refreshed() {
        let mut geo = MockGeolocationPort::new();
        geo.expect_current_position().times(2).returning(|_| Ok(fix()));
        let service = LocationService::new(Arc::new(geo), PositionOptions::default());

        service.current_position().await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        service.current_position().await.unwrap();
    }

    struct NeverAnswers;

    #[async_trait::async_trait]
    impl GeolocationPort for NeverAnswers {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Position, ApplicationError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let service = LocationService::new(Arc::new(NeverAnswers), PositionOptions::default());
        let err = service.current_position().await.unwrap_err();
        assert!(matches!(err, ApplicationError::Timeout { timeout_secs: 10 }));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let mut geo = MockGeolocationPort::new();
        geo.expect_current_position()
            .returning(|_| Err(ApplicationError::ExternalService("denied".to_string())));
        let service = LocationService::new(Arc::new(geo), PositionOptions::default());
        assert!(matches!(
            service.current_position().await,
            Err(ApplicationError::ExternalService(_))
        ));
    }
}
