//! Logging and tracing setup
//!
//! Installs a `tracing` subscriber writing human-readable or JSON lines to
//! stderr, filtered by `RUST_LOG` or the configured filter.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, init_telemetry};
