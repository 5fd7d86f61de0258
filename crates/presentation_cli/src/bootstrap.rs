//! Wiring from configuration to services

use std::sync::Arc;

use anyhow::{Context, bail};
use application::{AuthStore, LocationService, MapAdapter, PlaceFinder};
use domain::Coordinate;
use infrastructure::{
    AppConfig, FileKeyValueStore, HeadlessMapSdk, NaverDirectionsAdapter, NaverGeocodingAdapter,
    NaverSearchAdapter, StaticGeolocation, SupabaseAuthAdapter,
};
use tracing::debug;

/// Everything the search-and-route commands need
pub struct PlaceFinderApp {
    pub finder: PlaceFinder,
    pub map: MapAdapter,
    pub sdk: Arc<HeadlessMapSdk>,
}

impl std::fmt::Debug for PlaceFinderApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceFinderApp")
            .field("finder", &self.finder)
            .field("readiness", &self.map.readiness())
            .finish_non_exhaustive()
    }
}

/// Position source: `--from` wins over the configured fixed position
pub fn geolocation(config: &AppConfig, from: Option<Coordinate>) -> StaticGeolocation {
    let fixed = config.geolocation.fixed_position.as_ref();
    match from.or_else(|| fixed.and_then(|p| p.to_coordinate())) {
        Some(position) => {
            StaticGeolocation::new(position, fixed.and_then(|p| p.accuracy_meters))
        },
        None => StaticGeolocation::unavailable(),
    }
}

/// Search adapter on its own, for commands that never touch the map
pub fn search_adapter(config: &AppConfig) -> anyhow::Result<NaverSearchAdapter> {
    NaverSearchAdapter::new(&config.naver).context("place search is not configured")
}

/// Geocoding adapter on its own
pub fn geocoding_adapter(config: &AppConfig) -> anyhow::Result<NaverGeocodingAdapter> {
    NaverGeocodingAdapter::new(&config.naver).context("geocoding is not configured")
}

/// Build the page service with a headless map
pub fn place_finder(config: &AppConfig, from: Option<Coordinate>) -> anyhow::Result<PlaceFinderApp> {
    let search = Arc::new(search_adapter(config)?);
    let geocoder = Arc::new(geocoding_adapter(config)?);
    let directions = Arc::new(
        NaverDirectionsAdapter::new(&config.naver).context("directions are not configured")?,
    );

    let location = Arc::new(LocationService::new(
        Arc::new(geolocation(config, from)),
        config.geolocation.to_position_options(),
    ));

    let sdk = Arc::new(HeadlessMapSdk::new(true));
    let map = MapAdapter::new(directions, config.map.to_adapter_config());
    map.initialize(sdk.clone());
    debug!(container = %config.map.container, "Map adapter initialized");

    let finder = PlaceFinder::new(
        map.controller(),
        search.clone(),
        geocoder,
        search,
        location,
    );

    Ok(PlaceFinderApp { finder, map, sdk })
}

/// Build the auth store on top of the local storage directory
pub fn auth_store(config: &AppConfig) -> anyhow::Result<Arc<AuthStore>> {
    if !config.supabase.is_configured() {
        bail!("auth is not configured: set supabase.url and supabase.anon_key");
    }

    let storage = Arc::new(FileKeyValueStore::new(&config.storage.data_dir));
    let provider = SupabaseAuthAdapter::new(&config.supabase, storage.clone())
        .context("failed to create auth client")?;
    Ok(Arc::new(AuthStore::new(Arc::new(provider), storage)))
}

#[cfg(test)]
mod tests {
    use application::{GeolocationPort, PositionOptions};
    use infrastructure::FixedPositionConfig;

    use super::*;

    #[tokio::test]
    async fn from_flag_overrides_config() {
        let mut config = AppConfig::default();
        config.geolocation.fixed_position = Some(FixedPositionConfig {
            latitude: 37.5665,
            longitude: 126.978,
            accuracy_meters: Some(30.0),
        });
        let from = Coordinate::new(35.1796, 129.0756).unwrap();

        let position = geolocation(&config, Some(from))
            .current_position(&PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(position.coordinate, from);
    }

    #[tokio::test]
    async fn no_position_is_unavailable() {
        let result = geolocation(&AppConfig::default(), None)
            .current_position(&PositionOptions::default())
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn auth_requires_project_url() {
        let err = auth_store(&AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("auth is not configured"));
    }

    #[test]
    fn search_requires_credentials() {
        assert!(search_adapter(&AppConfig::default()).is_err());
    }
}
