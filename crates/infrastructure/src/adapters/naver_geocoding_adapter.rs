//! Geocoding adapter - Implements GeocodingPort using integration_naver

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{GeocodedAddress, GeocodingPort};
use async_trait::async_trait;
use integration_naver::{GeocodingClient, NaverConfig, NaverGeocodingClient};
use tracing::instrument;

use super::map_naver_error;

/// Adapter for address geocoding
pub struct NaverGeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
}

impl std::fmt::Debug for NaverGeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverGeocodingAdapter")
            .field("client", &"NaverGeocodingClient")
            .finish()
    }
}

impl NaverGeocodingAdapter {
    /// Create an adapter backed by the Naver geocoding API
    ///
    /// # Errors
    ///
    /// Returns an error if the geocoding credentials are missing.
    pub fn new(config: &NaverConfig) -> Result<Self, ApplicationError> {
        let client = NaverGeocodingClient::new(config).map_err(map_naver_error)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create an adapter from an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn GeocodingClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GeocodingPort for NaverGeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, ApplicationError> {
        let matched = self
            .client
            .geocode(address)
            .await
            .map_err(map_naver_error)?;
        Ok(GeocodedAddress {
            coordinate: matched.coordinate,
            road_address: matched.address,
        })
    }
}
