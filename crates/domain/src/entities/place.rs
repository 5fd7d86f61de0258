//! Place search results

use serde::{Deserialize, Serialize};

use crate::markup;
use crate::value_objects::Coordinate;

/// A place returned by the local search API
///
/// Created per search response and discarded on the next search.
/// `coordinates` is absent until resolved, either from the response's
/// fixed-point fields or via geocoding of `road_address`. A response whose
/// fixed-point fields could not be decoded keeps the failure in
/// `position_error` so it is reported rather than geocoded around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Title as delivered, possibly containing highlight markup
    pub title: String,
    /// Road-name address
    pub road_address: String,
    /// Telephone number (often empty)
    pub telephone: String,
    /// Detail page URL
    pub link: String,
    /// Resolved position, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
    /// Why the delivered position could not be decoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_error: Option<String>,
}

impl Place {
    /// Title with highlight markup removed
    #[must_use]
    pub fn display_title(&self) -> String {
        markup::to_plain_text(&self.title)
    }

    /// Whether the position is already known
    #[must_use]
    pub const fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Whether the response carried a position that failed to decode
    #[must_use]
    pub const fn has_malformed_position(&self) -> bool {
        self.position_error.is_some()
    }

    /// Copy of this place with resolved coordinates
    #[must_use]
    pub fn with_coordinates(mut self, coordinates: Coordinate) -> Self {
        self.coordinates = Some(coordinates);
        self.position_error = None;
        self
    }
}
