//! Subscriber initialization and configuration

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (e.g., "info", "debug", "application=debug,sqlx=warn")
    ///
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit one JSON object per line instead of the human-readable format
    #[serde(default)]
    pub json: bool,

    /// Include source file and line in each event
    #[serde(default)]
    pub with_source_location: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: false,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Build the event filter, preferring `RUST_LOG` over the configured filter
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::Filter` if the configured filter does not parse.
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.log_filter)
            .map_err(|e| TelemetryError::Filter(format!("{}: {e}", self.log_filter)))
    }
}

/// Install the global subscriber
///
/// Events go to stderr so that stdout stays free for command output.
///
/// # Errors
///
/// Fails if the filter is invalid or a global subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = config.env_filter()?;

    let base = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(config.with_source_location)
        .with_line_number(config.with_source_location);

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry
            .with(base.json().with_current_span(true).with_span_list(false))
            .try_init()
    } else {
        registry.with(base).try_init()
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(json = config.json, filter = %config.log_filter, "Logging initialized");
    Ok(())
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The log filter expression is invalid
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_filter, "info");
        assert!(!config.json);
        assert!(!config.with_source_location);
    }

    #[test]
    fn test_config_partial_deserialization() {
        let parsed: TelemetryConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert!(parsed.json);
        assert_eq!(parsed.log_filter, "info");
    }

    #[test]
    fn test_valid_filter_builds() {
        let config = TelemetryConfig {
            log_filter: "application=debug,sqlx=warn".to_string(),
            ..Default::default()
        };
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_init_twice_fails_second_time() {
        let config = TelemetryConfig::default();
        let first = init_telemetry(&config);
        let second = init_telemetry(&config);
        // Another test in this binary may have installed a subscriber first
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(TelemetryError::Init(_))));
    }
}
