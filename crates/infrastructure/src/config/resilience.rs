//! Retry configuration for calls to the weather source.

use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

/// Transport retry settings
///
/// Only transient failures are retried; the policy never turns a failing
/// city into a success on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryAppConfig {
    /// Extra attempts after the first request (default: 1)
    #[serde(default = "default_retry_max_retries")]
    pub max_retries: u32,

    /// Initial delay before first retry in milliseconds (default: 500ms)
    #[serde(default = "default_retry_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds (default: 5000ms)
    #[serde(default = "default_retry_max_delay")]
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_retry_multiplier")]
    pub multiplier: f64,
}

const fn default_retry_max_retries() -> u32 {
    1
}

const fn default_retry_initial_delay() -> u64 {
    500
}

const fn default_retry_max_delay() -> u64 {
    5_000
}

const fn default_retry_multiplier() -> f64 {
    2.0
}

impl Default for RetryAppConfig {
    fn default() -> Self {
        Self {
            max_retries: default_retry_max_retries(),
            initial_delay_ms: default_retry_initial_delay(),
            max_delay_ms: default_retry_max_delay(),
            multiplier: default_retry_multiplier(),
        }
    }
}

impl RetryAppConfig {
    /// Convert to `retry::RetryConfig` for use with retry operations
    #[must_use]
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_delay_ms: self.initial_delay_ms,
            max_delay_ms: self.max_delay_ms,
            multiplier: self.multiplier,
            ..RetryConfig::default()
        }
    }
}
