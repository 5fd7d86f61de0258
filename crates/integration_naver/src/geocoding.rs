//! Geocoding client
//!
//! Resolves a free-form address to a coordinate. Results are cached per
//! normalized address for the configured TTL.

use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use moka::future::Cache;
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::NaverConfig;
use crate::error::NaverError;
use crate::http::{self, CLIENT_ID_HEADER, CLIENT_SECRET_HEADER};
use crate::models::{GeocodeAddress, GeocodeMatch, GeocodeResponse};

const GEOCODE_PATH: &str = "/map-geocode/v2/geocode";

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve an address to its first match in provider order
    async fn geocode(&self, address: &str) -> Result<GeocodeMatch, NaverError>;
}

/// Naver geocoding client with result caching
#[derive(Debug)]
pub struct NaverGeocodingClient {
    client: Client,
    config: NaverConfig,
    cache: Option<Cache<String, GeocodeMatch>>,
}

impl NaverGeocodingClient {
    /// Create a new geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the geocoding credentials are missing or the HTTP
    /// client cannot be initialized.
    pub fn new(config: &NaverConfig) -> Result<Self, NaverError> {
        if !config.geocode.is_complete() {
            return Err(NaverError::ConfigurationError(
                "geocode key id and key are required".to_string(),
            ));
        }

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(
                    u64::from(config.geocode_cache_ttl_minutes) * 60,
                ))
                .build()
        });

        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            config: config.clone(),
            cache,
        })
    }

    fn decode(address: &GeocodeAddress) -> Result<GeocodeMatch, NaverError> {
        let parse = |field: &str, value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| NaverError::ParseError(format!("invalid {field} '{value}'")))
        };
        let lng = parse("x", &address.x)?;
        let lat = parse("y", &address.y)?;
        let coordinate =
            Coordinate::new(lat, lng).map_err(|e| NaverError::ParseError(e.to_string()))?;

        Ok(GeocodeMatch {
            coordinate,
            address: address.display_address().to_string(),
        })
    }
}

#[async_trait]
impl GeocodingClient for NaverGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeocodeMatch, NaverError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(NaverError::NoResult(String::new()));
        }

        let cache_key = address.to_lowercase();
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&cache_key).await {
                debug!("Geocoding cache hit");
                return Ok(hit);
            }
        }

        let url = format!("{}{GEOCODE_PATH}", self.config.geocode_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query", address)])
            .header(CLIENT_ID_HEADER, &self.config.geocode.id)
            .header(CLIENT_SECRET_HEADER, self.config.geocode.secret.expose_secret())
            .send()
            .await
            .map_err(|e| http::send_error(&e, self.config.timeout_secs))?;

        let body: GeocodeResponse = http::read_json(response, self.config.timeout_secs).await?;
        let first = body
            .addresses
            .first()
            .ok_or_else(|| NaverError::NoResult(address.to_string()))?;
        let matched = Self::decode(first)?;

        debug!(
            coordinate = %matched.coordinate,
            candidates = body.addresses.len(),
            "Address geocoded"
        );

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, matched.clone()).await;
        }
        Ok(matched)
    }
}
