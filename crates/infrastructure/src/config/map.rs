//! Map widget configuration

use std::time::Duration;

use application::{MapAdapterConfig, MapOptions, PolylineStyle};
use domain::Coordinate;
use serde::{Deserialize, Serialize};

/// Map widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapAppConfig {
    /// Element id the map is anchored to
    #[serde(default = "default_container")]
    pub container: String,

    /// Initial center latitude
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Initial center longitude
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// How often to check whether the map toolkit has loaded, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Route line width in pixels
    #[serde(default = "default_route_stroke_weight")]
    pub route_stroke_weight: u8,

    /// Route line color
    #[serde(default = "default_route_stroke_color")]
    pub route_stroke_color: String,
}

fn default_container() -> String {
    "map".to_string()
}

const fn default_center_lat() -> f64 {
    37.5665
}

const fn default_center_lng() -> f64 {
    126.978
}

const fn default_zoom() -> u8 {
    15
}

const fn default_poll_interval_ms() -> u64 {
    100
}

const fn default_route_stroke_weight() -> u8 {
    5
}

fn default_route_stroke_color() -> String {
    "red".to_string()
}

impl Default for MapAppConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_zoom(),
            poll_interval_ms: default_poll_interval_ms(),
            route_stroke_weight: default_route_stroke_weight(),
            route_stroke_color: default_route_stroke_color(),
        }
    }
}

impl MapAppConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.container.is_empty() {
            return Err("container must not be empty".to_string());
        }
        Coordinate::new(self.center_lat, self.center_lng).map_err(|e| e.to_string())?;
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".to_string());
        }
        if !(1..=21).contains(&self.zoom) {
            return Err("zoom must be between 1 and 21".to_string());
        }
        Ok(())
    }

    /// Build the map adapter settings
    ///
    /// An invalid center falls back to the default one.
    #[must_use]
    pub fn to_adapter_config(&self) -> MapAdapterConfig {
        let center = Coordinate::new(self.center_lat, self.center_lng)
            .unwrap_or_else(|_| Coordinate::seoul_city_hall());
        MapAdapterConfig {
            container: self.container.clone(),
            options: MapOptions {
                center,
                zoom: self.zoom,
            },
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            route_style: PolylineStyle {
                stroke_weight: self.route_stroke_weight,
                stroke_color: self.route_stroke_color.clone(),
            },
        }
    }
}
