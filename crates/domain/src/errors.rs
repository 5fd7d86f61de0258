//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the WGS84 range
    #[error("Invalid coordinates ({lat}, {lng}): latitude must be -90 to 90, longitude -180 to 180")]
    InvalidCoordinates {
        /// Rejected latitude
        lat: f64,
        /// Rejected longitude
        lng: f64,
    },

    /// Fixed-point coordinate string that is not an integer
    #[error("Invalid fixed-point coordinate: '{0}'")]
    InvalidFixedPoint(String),

    /// Invalid email address format
    #[error("Invalid email address: {0}")]
    InvalidEmailAddress(String),

    /// Form field constraint violated
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_coordinates_message_names_values() {
        let err = DomainError::InvalidCoordinates {
            lat: 91.0,
            lng: 0.0,
        };
        assert!(err.to_string().contains("91"));
    }

    #[test]
    fn invalid_fixed_point_message() {
        let err = DomainError::InvalidFixedPoint("12.5".to_string());
        assert_eq!(err.to_string(), "Invalid fixed-point coordinate: '12.5'");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("passwords do not match".to_string());
        assert_eq!(err.to_string(), "Validation failed: passwords do not match");
    }
}
