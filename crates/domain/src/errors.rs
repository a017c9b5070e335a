//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside the valid latitude/longitude ranges
    #[error("Invalid coordinates for {city}: latitude must be -90 to 90, longitude must be -180 to 180 (got {latitude}, {longitude})")]
    InvalidCoordinates {
        city: String,
        latitude: f64,
        longitude: f64,
    },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Date range with its end before its start
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
}

impl DomainError {
    /// Create an invalid coordinates error
    pub fn invalid_coordinates(city: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self::InvalidCoordinates {
            city: city.into(),
            latitude,
            longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_coordinates_creates_correct_error() {
        let err = DomainError::invalid_coordinates("Accra", 95.0, -0.2);
        match err {
            DomainError::InvalidCoordinates {
                city,
                latitude,
                longitude,
            } => {
                assert_eq!(city, "Accra");
                assert!((latitude - 95.0).abs() < f64::EPSILON);
                assert!((longitude + 0.2).abs() < f64::EPSILON);
            },
            _ => unreachable!("Expected InvalidCoordinates error"),
        }
    }

    #[test]
    fn invalid_coordinates_message_names_city() {
        let err = DomainError::invalid_coordinates("Kumasi", 6.69, 200.0);
        let msg = err.to_string();
        assert!(msg.contains("Kumasi"));
        assert!(msg.contains("200"));
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("city name is empty".to_string());
        assert_eq!(err.to_string(), "Validation failed: city name is empty");
    }

    #[test]
    fn invalid_date_range_message() {
        let err = DomainError::InvalidDateRange("2024-03-02 > 2024-03-01".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid date range: 2024-03-02 > 2024-03-01"
        );
    }
}
