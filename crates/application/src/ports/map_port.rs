//! Map widget ports
//!
//! [`MapSdk`] is the externally loaded mapping toolkit whose readiness can
//! only be polled. [`MapSurface`] is one constructed map instance. Both are
//! synchronous: every widget call is a cheap in-process mutation.

use std::fmt;
use std::sync::Arc;

use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Handle of a marker placed on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Handle of a polyline overlay drawn on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// Initial viewport of a new map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    /// Initial center
    pub center: Coordinate,
    /// Initial zoom level
    pub zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: Coordinate::seoul_city_hall(),
            zoom: 15,
        }
    }
}

/// Stroke used for route polylines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolylineStyle {
    /// Stroke width in pixels
    pub stroke_weight: u8,
    /// CSS color
    pub stroke_color: String,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            stroke_weight: 5,
            stroke_color: "red".to_string(),
        }
    }
}

/// A constructed map instance
#[cfg_attr(test, automock)]
pub trait MapSurface: Send + Sync {
    /// Move the viewport
    fn set_center(&self, position: Coordinate);

    /// Current viewport center
    fn center(&self) -> Coordinate;

    /// Place a marker
    fn add_marker(&self, position: Coordinate) -> MarkerId;

    /// Remove a marker; unknown ids are ignored
    fn remove_marker(&self, marker: MarkerId);

    /// Draw a polyline along `path`
    fn add_polyline(&self, path: &[Coordinate], style: &PolylineStyle) -> OverlayId;

    /// Remove an overlay; unknown ids are ignored
    fn remove_overlay(&self, overlay: OverlayId);
}

/// The asynchronously loaded mapping toolkit
#[cfg_attr(test, automock)]
pub trait MapSdk: Send + Sync {
    /// Whether the toolkit's entry point is available yet
    fn is_loaded(&self) -> bool;

    /// Construct a map anchored to `container`
    fn create_map(
        &self,
        container: &str,
        options: &MapOptions,
    ) -> Result<Arc<dyn MapSurface>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_center_on_city_hall() {
        let options = MapOptions::default();
        assert_eq!(options.center, Coordinate::seoul_city_hall());
        assert_eq!(options.zoom, 15);
    }

    #[test]
    fn default_route_style() {
        let style = PolylineStyle::default();
        assert_eq!(style.stroke_weight, 5);
        assert_eq!(style.stroke_color, "red");
    }

    #[test]
    fn handles_display() {
        assert_eq!(MarkerId(3).to_string(), "marker#3");
        assert_eq!(OverlayId(7).to_string(), "overlay#7");
    }
}
