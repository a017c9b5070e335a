//! Weather data models
//!
//! Data structures for the Open-Meteo hourly forecast response.

use serde::{Deserialize, Serialize};

/// One hour of the temperature series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Timestamp as reported by the API, local to `HourlyForecast::timezone`
    pub time: String,
    /// Air temperature at 2 m in °C, `None` when the API has no value
    pub temperature: Option<f64>,
}

/// Hourly temperature series for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Latitude of the grid cell used by the API
    pub latitude: f64,
    /// Longitude of the grid cell used by the API
    pub longitude: f64,
    /// Timezone the timestamps are expressed in
    pub timezone: Option<String>,
    /// Offset of `timezone` from UTC in seconds
    pub utc_offset_seconds: i32,
    /// Hourly points in chronological order
    pub points: Vec<HourlyPoint>,
}

impl HourlyForecast {
    /// Number of hourly points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points that carry a temperature
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.points.iter().filter(|p| p.temperature.is_some()).count()
    }
}

/// Hourly block of the API response
#[derive(Debug, Deserialize)]
pub(crate) struct HourlyData {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
}

/// API response structure
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub hourly: Option<HourlyData>,
}
