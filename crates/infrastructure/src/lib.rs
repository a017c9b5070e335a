//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer: the Open-Meteo
//! weather source, the sqlx daily weather stores, plus configuration loading,
//! transport retry and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod retry;
pub mod telemetry;
#[cfg(test)]
pub mod testing;

pub use adapters::*;
pub use config::{AppConfig, CityConfig, DatabaseConfig, RetryAppConfig};
pub use persistence::{
    Database, DatabaseBackend, DatabaseError, PgDailyWeatherStore, SqliteDailyWeatherStore,
    connect,
};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
