//! Naver Open API integration
//!
//! HTTP clients for the four provider endpoints the place finder uses:
//!
//! - [`LocalSearchClient`] / [`BlogSearchClient`] via [`NaverSearchClient`]
//! - [`GeocodingClient`] via [`NaverGeocodingClient`] (cached)
//! - [`DirectionsClient`] via [`NaverDirectionsClient`]
//!
//! Every client imposes the configured request timeout and maps non-2xx
//! responses to [`NaverError::Http`] with the status preserved.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_naver::{LocalSearchClient, NaverConfig, NaverSearchClient};
//!
//! let client = NaverSearchClient::new(&config)?;
//! let items = client.search_local("강남구청").await?;
//! ```

mod config;
mod directions;
mod error;
mod geocoding;
mod http;
mod models;
mod search;

pub use config::{Credentials, DurationUnit, NaverConfig};
pub use directions::{DirectionsClient, NaverDirectionsClient};
pub use error::NaverError;
pub use geocoding::{GeocodingClient, NaverGeocodingClient};
pub use models::{
    BlogItem, BlogSearchResponse, DirectionsResponse, GeocodeAddress, GeocodeMatch,
    GeocodeResponse, LocalSearchItem, LocalSearchResponse, RouteEntry, RouteSummaryRaw,
};
pub use search::{BlogSearchClient, LocalSearchClient, NaverSearchClient};
