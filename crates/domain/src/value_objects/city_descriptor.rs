//! City descriptor value object
//!
//! Identifies one city the pipeline extracts weather for: a unique name and
//! the coordinates sent to the weather source.

use serde::Serialize;
use std::fmt;

use super::GeoLocation;
use crate::DomainError;

/// Width of the `city` column in the `weather_daily` table
pub const MAX_CITY_NAME_LEN: usize = 50;

/// A configured city with validated coordinates
///
/// # Examples
///
/// ```
/// use domain::value_objects::CityDescriptor;
///
/// let accra = CityDescriptor::new("Accra", 5.55, -0.20).expect("valid city");
/// assert_eq!(accra.name(), "Accra");
///
/// assert!(CityDescriptor::new("Nowhere", 120.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityDescriptor {
    name: String,
    location: GeoLocation,
}

impl CityDescriptor {
    /// Create a validated city descriptor
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` for out-of-range or NaN
    /// coordinates and `DomainError::ValidationError` for a blank name or a
    /// name longer than [`MAX_CITY_NAME_LEN`] characters.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "city name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_CITY_NAME_LEN {
            return Err(DomainError::ValidationError(format!(
                "city name '{name}' exceeds {MAX_CITY_NAME_LEN} characters"
            )));
        }

        let location = GeoLocation::new(latitude, longitude)
            .map_err(|_| DomainError::invalid_coordinates(&name, latitude, longitude))?;

        Ok(Self { name, location })
    }

    /// City name, unique within one pipeline run
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated coordinates
    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        self.location
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.latitude()
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.longitude()
    }
}

impl fmt::Display for CityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}
