//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod daily_weather_store;
mod weather_source_port;

#[cfg(test)]
pub use daily_weather_store::MockDailyWeatherStore;
pub use daily_weather_store::{DailyWeatherStore, UpsertSummary};
#[cfg(test)]
pub use weather_source_port::MockWeatherSourcePort;
pub use weather_source_port::WeatherSourcePort;
