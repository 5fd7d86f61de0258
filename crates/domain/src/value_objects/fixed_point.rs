//! Fixed-point coordinate component
//!
//! The local search API transmits coordinates as decimal integers scaled by
//! 10^7 (`mapx="1271234567"` is 127.1234567 degrees).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A single coordinate component in 10^-7 degree units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedPoint(i64);

impl FixedPoint {
    /// Number of fixed-point units per degree
    pub const SCALE: f64 = 10_000_000.0;

    /// Wrap a raw scaled integer
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Parse a provider string such as `"1271234567"`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFixedPoint` if the string is not a signed integer.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        value
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidFixedPoint(value.to_string()))
    }

    /// Encode degrees, rounding to the nearest unit
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // |degrees| <= 180 keeps this far inside i64
    pub fn from_degrees(degrees: f64) -> Self {
        Self((degrees * Self::SCALE).round() as i64)
    }

    /// Decode to degrees
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // values stay below 2^53
    pub fn to_degrees(self) -> f64 {
        self.0 as f64 / Self::SCALE
    }

    /// The raw scaled integer
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_decode() {
        let x = FixedPoint::parse("1271234567").unwrap();
        assert_eq!(x.raw(), 1_271_234_567);
        assert!((x.to_degrees() - 127.123_456_7).abs() < 1e-9);
    }

    #[test]
    fn parse_negative() {
        let x = FixedPoint::parse("-741234567").unwrap();
        assert!((x.to_degrees() + 74.123_456_7).abs() < 1e-9);
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(FixedPoint::parse(" 375234567 ").unwrap().raw(), 375_234_567);
    }

    #[test]
    fn parse_rejects_decimal_strings() {
        assert!(matches!(
            FixedPoint::parse("127.123"),
            Err(DomainError::InvalidFixedPoint(_))
        ));
        assert!(FixedPoint::parse("").is_err());
    }

    #[test]
    fn encode_rounds_to_nearest() {
        assert_eq!(FixedPoint::from_degrees(127.123_456_7).raw(), 1_271_234_567);
        assert_eq!(FixedPoint::from_degrees(37.523_456_7).raw(), 375_234_567);
    }
}
