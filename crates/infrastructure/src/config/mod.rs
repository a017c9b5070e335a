//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: connection URL and pool settings
//! - `resilience`: transport retry
//! - `cities`: the `[[cities]]` list
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `WEATHER_ETL__*` environment variables (e.g. `WEATHER_ETL__DATABASE__URL`).

mod cities;
mod database;
mod resilience;

use std::path::Path;

use application::PipelineSettings;
use domain::{CityDescriptor, DomainError};
use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::telemetry::TelemetryConfig;

pub use cities::CityConfig;
pub use database::DatabaseConfig;
pub use resilience::RetryAppConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WEATHER_ETL";

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cadence expression owned by the external scheduler (e.g. "@daily")
    ///
    /// Carried for the scheduler's benefit; the pipeline never reads it.
    #[serde(default = "default_schedule")]
    pub schedule: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub retry: RetryAppConfig,

    #[serde(default)]
    pub pipeline: PipelineSettings,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Cities to extract, in run order
    #[serde(default = "cities::default_cities")]
    pub cities: Vec<CityConfig>,
}

fn default_schedule() -> String {
    "@daily".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            database: DatabaseConfig::default(),
            weather: WeatherConfig::default(),
            retry: RetryAppConfig::default(),
            pipeline: PipelineSettings::default(),
            telemetry: TelemetryConfig::default(),
            cities: cities::default_cities(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, a TOML file and the environment
    ///
    /// With `Some(path)` the file must exist. With `None`, `config.toml` in
    /// the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(
            cities = config.cities.len(),
            database = %config.database.scheme(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration from a TOML string, without file or environment
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Validated city descriptors, in configured order
    ///
    /// Duplicate names are left to the pipeline, which rejects them before
    /// any I/O.
    pub fn city_descriptors(&self) -> Result<Vec<CityDescriptor>, DomainError> {
        self.cities.iter().map(CityConfig::to_descriptor).collect()
    }
}
