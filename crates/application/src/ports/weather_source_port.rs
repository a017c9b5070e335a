//! Weather source port
//!
//! Defines the interface for extracting hourly readings for one city.

use async_trait::async_trait;
use domain::{CityDescriptor, DateRange, HourlyReading};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for hourly weather extraction
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherSourcePort: Send + Sync {
    /// Fetch the hourly readings for `city` covering `range`
    ///
    /// Readings are returned in chronological order, one per hour the source
    /// reports. Missing temperatures become `None` readings rather than errors.
    ///
    /// # Errors
    ///
    /// `ApplicationError::Configuration` for coordinates the source cannot
    /// accept (raised before any network call) and
    /// `ApplicationError::SourceUnavailable` for network, status or schema
    /// failures.
    async fn fetch_hourly(
        &self,
        city: &CityDescriptor,
        range: &DateRange,
    ) -> Result<Vec<HourlyReading>, ApplicationError>;
}
