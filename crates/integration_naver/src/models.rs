//! Naver API response models
//!
//! Field names follow the wire format. Every field is defaulted so a partial
//! item never fails the whole response.

use std::collections::HashMap;

use domain::Coordinate;
use serde::{Deserialize, Serialize};

/// Local search response (`/v1/search/local.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSearchResponse {
    /// Total number of matches
    #[serde(default)]
    pub total: u32,
    /// Result items
    #[serde(default)]
    pub items: Vec<LocalSearchItem>,
}

/// A place as returned by local search
///
/// `mapx`/`mapy` are scaled-integer strings (degrees × 10^7), longitude first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSearchItem {
    /// Title with `<b>` highlight markup
    #[serde(default)]
    pub title: String,
    /// Detail page URL
    #[serde(default)]
    pub link: String,
    /// Category path (`음식점>한식`)
    #[serde(default)]
    pub category: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Telephone number
    #[serde(default)]
    pub telephone: String,
    /// Lot-number address
    #[serde(default)]
    pub address: String,
    /// Road-name address
    #[serde(default)]
    pub road_address: String,
    /// Longitude, fixed point
    #[serde(default)]
    pub mapx: String,
    /// Latitude, fixed point
    #[serde(default)]
    pub mapy: String,
}

impl LocalSearchItem {
    /// Whether the item carries both fixed-point fields
    #[must_use]
    pub fn has_position(&self) -> bool {
        !self.mapx.trim().is_empty() && !self.mapy.trim().is_empty()
    }
}

/// Blog search response (`/v1/search/blog.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogSearchResponse {
    /// Total number of matches
    #[serde(default)]
    pub total: u32,
    /// Result items
    #[serde(default)]
    pub items: Vec<BlogItem>,
}

/// A blog post as returned by blog search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogItem {
    /// Title with highlight markup
    #[serde(default)]
    pub title: String,
    /// Post URL
    #[serde(default)]
    pub link: String,
    /// Excerpt with highlight markup
    #[serde(default)]
    pub description: String,
    /// Author display name
    #[serde(default)]
    pub bloggername: String,
    /// Blog home URL
    #[serde(default)]
    pub bloggerlink: String,
    /// Publication date, `yyyyMMdd`
    #[serde(default)]
    pub postdate: String,
}

/// Geocoding response (`/map-geocode/v2/geocode`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResponse {
    /// `OK` on success
    #[serde(default)]
    pub status: String,
    /// Matching addresses in provider order
    #[serde(default)]
    pub addresses: Vec<GeocodeAddress>,
    /// Error message when `status` is not `OK`
    #[serde(default)]
    pub error_message: String,
}

/// One geocoding match; `x`/`y` are decimal-degree strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeAddress {
    /// Road-name address
    #[serde(default)]
    pub road_address: String,
    /// Lot-number address
    #[serde(default)]
    pub jibun_address: String,
    /// English address
    #[serde(default)]
    pub english_address: String,
    /// Longitude
    #[serde(default)]
    pub x: String,
    /// Latitude
    #[serde(default)]
    pub y: String,
}

impl GeocodeAddress {
    /// Road address, falling back to the lot-number address
    #[must_use]
    pub fn display_address(&self) -> &str {
        if self.road_address.is_empty() {
            &self.jibun_address
        } else {
            &self.road_address
        }
    }
}

/// Best geocoding match, decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    /// Resolved position
    pub coordinate: Coordinate,
    /// Display address
    pub address: String,
}

/// Driving directions response (`/map-direction/v1/driving`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    /// `0` when a route was found
    pub code: i64,
    /// Provider message
    #[serde(default)]
    pub message: String,
    /// Routes keyed by route option (`traoptimal`, ...)
    #[serde(default)]
    pub route: HashMap<String, Vec<RouteEntry>>,
}

/// One route alternative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Distance, time and fares
    pub summary: RouteSummaryRaw,
    /// Polyline as `[lng, lat]` pairs
    #[serde(default)]
    pub path: Vec<[f64; 2]>,
}

/// Route summary as sent by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummaryRaw {
    /// Meters
    #[serde(default)]
    pub distance: u64,
    /// Provider duration units
    #[serde(default)]
    pub duration: u64,
    /// Won
    #[serde(default)]
    pub toll_fare: Option<u64>,
    /// Won
    #[serde(default)]
    pub taxi_fare: Option<u64>,
    /// Won
    #[serde(default)]
    pub fuel_price: Option<u64>,
}
