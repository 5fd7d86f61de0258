//! Geographic coordinate value object

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fixed_point::FixedPoint;
use crate::errors::DomainError;

/// A WGS84 coordinate with latitude and longitude in degrees
///
/// Immutable once constructed. Latitude is always within [-90, 90] and
/// longitude within [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    lat: f64,
    /// Longitude in degrees (-180 to 180)
    lng: f64,
}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either component is not
    /// finite or lies outside its valid range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Create a coordinate without validation (for compile-time constants)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180].
    #[must_use]
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Decode a coordinate from the provider's fixed-point `mapx`/`mapy` strings
    ///
    /// `mapx` carries the longitude and `mapy` the latitude, both scaled by 10^7.
    ///
    /// # Errors
    ///
    /// Returns an error if either string is not an integer or the decoded
    /// degrees fall outside the valid range.
    pub fn from_fixed_point(mapx: &str, mapy: &str) -> Result<Self, DomainError> {
        let lng = FixedPoint::parse(mapx)?.to_degrees();
        let lat = FixedPoint::parse(mapy)?.to_degrees();
        Self::new(lat, lng)
    }

    /// Re-encode as `(mapx, mapy)` fixed-point values
    #[must_use]
    pub fn to_fixed_point(&self) -> (FixedPoint, FixedPoint) {
        (
            FixedPoint::from_degrees(self.lng),
            FixedPoint::from_degrees(self.lat),
        )
    }

    /// Get the latitude
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Get the longitude
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Render as `"lng,lat"`, the order the directions endpoint expects
    #[must_use]
    pub fn as_lng_lat_param(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }

    /// Approximate great-circle distance to another coordinate in kilometers
    ///
    /// Uses the Haversine formula.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lng / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.7}, {:.7}", self.lat, self.lng)
    }
}

/// Well-known locations
impl Coordinate {
    /// Seoul City Hall, the default map center
    #[must_use]
    pub const fn seoul_city_hall() -> Self {
        Self::new_unchecked(37.5665, 126.978)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let c = Coordinate::new(37.5665, 126.978).expect("valid coordinates");
        assert!((c.lat() - 37.5665).abs() < f64::EPSILON);
        assert!((c.lng() - 126.978).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_fixed_point_gangnam() {
        let c = Coordinate::from_fixed_point("1270234567", "375234567").unwrap();
        assert!((c.lat() - 37.523_456_7).abs() < 1e-9);
        assert!((c.lng() - 127.023_456_7).abs() < 1e-9);
    }

    #[test]
    fn test_from_fixed_point_rejects_garbage() {
        assert!(Coordinate::from_fixed_point("abc", "375234567").is_err());
        assert!(Coordinate::from_fixed_point("1270234567", "").is_err());
    }

    #[test]
    fn test_from_fixed_point_rejects_out_of_range() {
        // 950 degrees latitude
        assert!(Coordinate::from_fixed_point("1270234567", "9500000000").is_err());
    }

    #[test]
    fn test_fixed_point_roundtrip_keeps_seventh_digit() {
        let c = Coordinate::from_fixed_point("1271234567", "375234567").unwrap();
        let (x, y) = c.to_fixed_point();
        assert_eq!(x.raw(), 1_271_234_567);
        assert_eq!(y.raw(), 375_234_567);
    }

    #[test]
    fn test_lng_lat_param_order() {
        let c = Coordinate::new(37.5665, 126.978).unwrap();
        assert_eq!(c.as_lng_lat_param(), "126.978,37.5665");
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let c = Coordinate::seoul_city_hall();
        assert!(c.distance_km(&c).abs() < 1e-9);
    }

    #[test]
    fn test_distance_city_hall_to_gangnam() {
        let hall = Coordinate::seoul_city_hall();
        let gangnam = Coordinate::new(37.523_456_7, 127.023_456_7).unwrap();
        let d = hall.distance_km(&gangnam);
        assert!(d > 5.0 && d < 8.0, "got {d}");
    }

    #[test]
    fn test_display() {
        let c = Coordinate::new(37.5, 127.0).unwrap();
        assert_eq!(c.to_string(), "37.5000000, 127.0000000");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let c = Coordinate::new(37.5665, 126.978).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"lat":37.5665,"lng":126.978}"#);
        let parsed: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, c);
    }
}
