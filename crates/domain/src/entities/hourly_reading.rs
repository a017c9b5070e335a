//! Hourly reading entity
//!
//! One raw temperature observation for one city and hour, as reported by the
//! weather source. Readings only live in memory for the duration of a run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single hourly temperature reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyReading {
    /// Name of the city the reading belongs to
    pub city: String,
    /// Timestamp text as reported by the source (ISO 8601, hour resolution)
    ///
    /// Kept verbatim so the aggregation step can reject values it cannot
    /// interpret instead of silently shifting them to another day.
    pub timestamp: String,
    /// Temperature in Celsius, `None` when the source reported no value
    pub temperature: Option<f64>,
}

impl HourlyReading {
    /// Create a new reading
    pub fn new(
        city: impl Into<String>,
        timestamp: impl Into<String>,
        temperature: Option<f64>,
    ) -> Self {
        Self {
            city: city.into(),
            timestamp: timestamp.into(),
            temperature,
        }
    }
}

impl fmt::Display for HourlyReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.temperature {
            Some(t) => write!(f, "{} @ {}: {t:.1}°C", self.city, self.timestamp),
            None => write!(f, "{} @ {}: no data", self.city, self.timestamp),
        }
    }
}
