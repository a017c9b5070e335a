//! City list configuration.

use domain::{CityDescriptor, DomainError};
use serde::{Deserialize, Serialize};

/// One `[[cities]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityConfig {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Validate into a domain descriptor
    pub fn to_descriptor(&self) -> Result<CityDescriptor, DomainError> {
        CityDescriptor::new(&self.name, self.latitude, self.longitude)
    }
}

/// Cities extracted when none are configured
pub(crate) fn default_cities() -> Vec<CityConfig> {
    vec![
        CityConfig::new("Accra", 5.55, -0.20),
        CityConfig::new("Kumasi", 6.69, -1.63),
        CityConfig::new("Takoradi", 4.89, -1.75),
    ]
}
