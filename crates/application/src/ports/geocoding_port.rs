//! Geocoding port
//!
//! Resolves a postal address to a single coordinate.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Best match for an address query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    /// Resolved position
    pub coordinate: Coordinate,
    /// Display address (road address, or the lot-number address as fallback)
    pub road_address: String,
}

/// Port for address → coordinate resolution
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve an address
    ///
    /// Fails with `NoResult` when the provider returns zero matches; when
    /// several match, the first in provider order wins.
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, ApplicationError>;
}
