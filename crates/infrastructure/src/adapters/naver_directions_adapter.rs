//! Directions adapter - Implements DirectionsPort using integration_naver

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::DirectionsPort;
use async_trait::async_trait;
use domain::{Coordinate, RouteSummary};
use integration_naver::{DirectionsClient, NaverConfig, NaverDirectionsClient};
use tracing::instrument;

use super::map_naver_error;

/// Adapter for driving directions
pub struct NaverDirectionsAdapter {
    client: Arc<dyn DirectionsClient>,
}

impl std::fmt::Debug for NaverDirectionsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverDirectionsAdapter")
            .field("client", &"NaverDirectionsClient")
            .finish()
    }
}

impl NaverDirectionsAdapter {
    /// Create an adapter backed by the Naver directions API
    ///
    /// # Errors
    ///
    /// Returns an error if the directions credentials are missing.
    pub fn new(config: &NaverConfig) -> Result<Self, ApplicationError> {
        let client = NaverDirectionsClient::new(config).map_err(map_naver_error)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create an adapter from an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn DirectionsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectionsPort for NaverDirectionsAdapter {
    #[instrument(skip_all, fields(start = %start, goal = %goal))]
    async fn route(
        &self,
        start: &Coordinate,
        goal: &Coordinate,
    ) -> Result<RouteSummary, ApplicationError> {
        self.client
            .driving_route(start, goal)
            .await
            .map_err(map_naver_error)
    }
}

#[cfg(test)]
mod tests {
    use integration_naver::NaverError;

    use super::*;

    struct FixedDirections(Result<RouteSummary, (i64, &'static str)>);

    #[async_trait]
    impl DirectionsClient for FixedDirections {
        async fn driving_route(
            &self,
            _start: &Coordinate,
            _goal: &Coordinate,
        ) -> Result<RouteSummary, NaverError> {
            self.0.clone().map_err(|(code, message)| NaverError::NoRoute {
                code,
                message: message.to_string(),
            })
        }
    }

    fn endpoints() -> (Coordinate, Coordinate) {
        (
            Coordinate::seoul_city_hall(),
            Coordinate::new(37.5174118, 127.0473159).unwrap(),
        )
    }

    #[tokio::test]
    async fn passes_route_through() {
        let (start, goal) = endpoints();
        let adapter = NaverDirectionsAdapter::with_client(Arc::new(FixedDirections(Ok(
            RouteSummary::new(5000, 600, vec![start, goal]),
        ))));

        let summary = adapter.route(&start, &goal).await.unwrap();
        assert_eq!(summary.distance_meters, 5000);
        assert_eq!(summary.path, vec![start, goal]);
    }

    #[tokio::test]
    async fn no_route_keeps_code() {
        let (start, goal) = endpoints();
        let adapter = NaverDirectionsAdapter::with_client(Arc::new(FixedDirections(Err((
            2,
            "no road near the goal",
        )))));

        let err = adapter.route(&start, &goal).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NoRoute { code: 2 }));
    }

    #[test]
    fn new_requires_directions_credentials() {
        assert!(NaverDirectionsAdapter::new(&NaverConfig::default()).is_err());
        assert!(NaverDirectionsAdapter::new(&NaverConfig::for_testing()).is_ok());
    }
}
