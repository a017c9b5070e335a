//! Daily average entity
//!
//! The unit of durable output: one mean temperature per city per calendar
//! date. Keyed by `(date, city)` in storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean temperature for one city on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAverage {
    /// Calendar date in the city's reported timezone
    pub date: NaiveDate,
    /// City name
    pub city: String,
    /// Mean of the non-null hourly readings, `None` when every reading was absent
    pub temperature: Option<f64>,
}

impl DailyAverage {
    /// Create a new daily average
    pub fn new(date: NaiveDate, city: impl Into<String>, temperature: Option<f64>) -> Self {
        Self {
            date,
            city: city.into(),
            temperature,
        }
    }

    /// Storage key of this record
    #[must_use]
    pub fn key(&self) -> (NaiveDate, &str) {
        (self.date, self.city.as_str())
    }

    /// Whether the day had no usable readings
    #[must_use]
    pub const fn is_empty_day(&self) -> bool {
        self.temperature.is_none()
    }
}

impl fmt::Display for DailyAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.temperature {
            Some(t) => write!(f, "{} {}: {t:.2}°C", self.date, self.city),
            None => write!(f, "{} {}: no data", self.date, self.city),
        }
    }
}
