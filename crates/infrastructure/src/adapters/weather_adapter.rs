//! Weather source adapter - Implements WeatherSourcePort using integration_weather

use std::{fmt, sync::Arc};

use application::error::ApplicationError;
use application::ports::WeatherSourcePort;
use async_trait::async_trait;
use domain::{CityDescriptor, DateRange, HourlyReading};
use integration_weather::{
    HourlyForecast, OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument, warn};

use crate::retry::{RetryConfig, with_retry};

/// Adapter extracting hourly readings from Open-Meteo
pub struct OpenMeteoSourceAdapter {
    client: Arc<dyn WeatherClient>,
    retry: RetryConfig,
}

impl fmt::Debug for OpenMeteoSourceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenMeteoSourceAdapter")
            .field("client", &"WeatherClient")
            .field("max_retries", &self.retry.max_retries)
            .finish()
    }
}

impl OpenMeteoSourceAdapter {
    /// Create an adapter over a new Open-Meteo client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: WeatherConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = OpenMeteoClient::new(config)
            .map_err(|e| ApplicationError::Configuration(format!("weather client: {e}")))?;
        Ok(Self::with_client(Arc::new(client), retry))
    }

    /// Create an adapter over any weather client
    pub fn with_client(client: Arc<dyn WeatherClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Map integration weather error to application error
    fn map_error(city: &CityDescriptor, err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::InvalidCoordinates => ApplicationError::Configuration(format!(
                "invalid coordinates for {city}"
            )),
            other => ApplicationError::source_unavailable(city.name(), other.to_string()),
        }
    }

    /// Flatten the hourly series into readings tagged with the city name
    fn to_readings(city: &CityDescriptor, forecast: HourlyForecast) -> Vec<HourlyReading> {
        forecast
            .points
            .into_iter()
            .map(|point| HourlyReading::new(city.name(), point.time, point.temperature))
            .collect()
    }
}

#[async_trait]
impl WeatherSourcePort for OpenMeteoSourceAdapter {
    #[instrument(skip(self, city, range), fields(city = %city.name(), range = %range))]
    async fn fetch_hourly(
        &self,
        city: &CityDescriptor,
        range: &DateRange,
    ) -> Result<Vec<HourlyReading>, ApplicationError> {
        let outcome = with_retry(&self.retry, || {
            self.client
                .get_hourly(city.latitude(), city.longitude(), range.start(), range.end())
        })
        .await;

        let attempts = outcome.attempts;
        match outcome.into_result() {
            Ok(forecast) => {
                debug!(
                    points = forecast.len(),
                    missing = forecast.len() - forecast.present_count(),
                    timezone = forecast.timezone.as_deref().unwrap_or("unknown"),
                    attempts,
                    "Retrieved hourly temperatures"
                );
                Ok(Self::to_readings(city, forecast))
            },
            Err(e) => {
                warn!(error = %e, attempts, "Failed to retrieve hourly temperatures");
                Err(Self::map_error(city, e))
            },
        }
    }
}
