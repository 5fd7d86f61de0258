//! Driving route summary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::Coordinate;

/// Result of a single directions request
///
/// Superseded by the next request; the path is always in (lat, lng) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Total driving distance in meters
    pub distance_meters: u64,
    /// Estimated driving time in seconds
    pub duration_seconds: u64,
    /// Ordered polyline from start to goal
    pub path: Vec<Coordinate>,
    /// Toll charges in won
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toll_fare: Option<u64>,
    /// Estimated taxi fare in won
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxi_fare: Option<u64>,
    /// Estimated fuel cost in won
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_price: Option<u64>,
}

impl RouteSummary {
    /// Create a summary without fare information
    #[must_use]
    pub const fn new(distance_meters: u64, duration_seconds: u64, path: Vec<Coordinate>) -> Self {
        Self {
            distance_meters,
            duration_seconds,
            path,
            toll_fare: None,
            taxi_fare: None,
            fuel_price: None,
        }
    }

    /// Distance in kilometers
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters as f64 / 1000.0
    }

    /// Duration in whole minutes, rounded up
    #[must_use]
    pub const fn duration_minutes(&self) -> u64 {
        self.duration_seconds.div_ceil(60)
    }

    /// The `{distance, duration}` pair handed to route completion callbacks
    #[must_use]
    pub const fn stats(&self) -> RouteStats {
        RouteStats {
            distance: self.distance_meters,
            duration: self.duration_seconds,
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} km, {} min",
            self.distance_km(),
            self.duration_minutes()
        )?;
        if let Some(toll) = self.toll_fare.filter(|t| *t > 0) {
            write!(f, ", toll {toll} KRW")?;
        }
        Ok(())
    }
}

/// Distance (meters) and duration (seconds) of a drawn route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStats {
    /// Meters
    pub distance: u64,
    /// Seconds
    pub duration: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_rounds_up_to_minutes() {
        let summary = RouteSummary::new(5000, 601, Vec::new());
        assert_eq!(summary.duration_minutes(), 11);
        let summary = RouteSummary::new(5000, 600, Vec::new());
        assert_eq!(summary.duration_minutes(), 10);
    }

    #[test]
    fn display_formats_km_and_minutes() {
        let summary = RouteSummary::new(5000, 600, Vec::new());
        assert_eq!(summary.to_string(), "5.00 km, 10 min");
    }

    #[test]
    fn display_includes_toll_when_charged() {
        let mut summary = RouteSummary::new(12_346, 1200, Vec::new());
        summary.toll_fare = Some(1800);
        assert_eq!(summary.to_string(), "12.35 km, 20 min, toll 1800 KRW");
    }

    #[test]
    fn stats_mirror_summary() {
        let summary = RouteSummary::new(5000, 600, Vec::new());
        assert_eq!(
            summary.stats(),
            RouteStats {
                distance: 5000,
                duration: 600
            }
        );
    }
}
