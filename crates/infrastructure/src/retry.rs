//! Transport retry with exponential backoff
//!
//! Used by the weather source adapter to repeat a request after a transient
//! failure (timeout, connection error, 5xx, 429). Non-transient errors are
//! returned on the first attempt.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Backoff policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Extra attempts after the first one (default: 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds (default: 500)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay in milliseconds (default: 5000)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Growth factor between consecutive delays (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Relative jitter applied to each delay, 0.0 disables it (default: 0.1)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

const fn default_max_retries() -> u32 {
    1
}

const fn default_initial_delay() -> u64 {
    500
}

const fn default_max_delay() -> u64 {
    5_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    /// A policy that never retries
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Same policy with deterministic delays
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_factor = 0.0;
        self
    }

    /// Delay before retry number `attempt` (0-indexed)
    ///
    /// `initial_delay * multiplier^attempt`, capped at `max_delay`, then
    /// spread by up to `jitter_factor` in either direction.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let base = (self.initial_delay_ms as f64) * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay_ms as f64);

        let spread = capped * self.jitter_factor.clamp(0.0, 1.0);
        let delay = if spread > 0.0 {
            capped + rand::rng().random_range(-spread..=spread)
        } else {
            capped
        };

        Duration::from_millis(delay.max(0.0) as u64)
    }
}

/// Errors that know whether repeating the operation may help
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for integration_weather::WeatherError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

/// Final result plus how many attempts it took
#[derive(Debug)]
pub struct RetryResult<T, E> {
    pub result: Result<T, E>,
    /// 1 means no retry happened
    pub attempts: u32,
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    /// Discard the attempt metadata
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation` until it succeeds, fails permanently or retries run out
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let err = match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(attempts, "Succeeded after retry");
                }
                return RetryResult {
                    result: Ok(value),
                    attempts,
                    total_duration: started.elapsed(),
                };
            },
            Err(err) => err,
        };

        let retries_used = attempts - 1;
        if !err.is_retryable() || retries_used >= config.max_retries {
            if err.is_retryable() {
                warn!(attempts, error = %err, "Giving up after retries");
            }
            return RetryResult {
                result: Err(err),
                attempts,
                total_duration: started.elapsed(),
            };
        }

        let delay = config.delay_for_attempt(retries_used);
        warn!(
            attempt = attempts,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Transient failure, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

/// `with_retry` without the metadata
pub async fn retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry(config, operation).await.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use integration_weather::WeatherError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 5,
            max_delay_ms: 20,
            multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn defaults_allow_one_retry() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.initial_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 5_000);
        assert!((config.multiplier - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn disabled_policy() {
        assert_eq!(RetryConfig::disabled().max_retries, 0);
    }

    #[test]
    fn delays_grow_and_cap() {
        let config = RetryConfig::default().without_jitter();

        assert_eq!(config.delay_for_attempt(0).as_millis(), 500);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 1000);
        assert_eq!(config.delay_for_attempt(3).as_millis(), 4000);
        assert_eq!(config.delay_for_attempt(4).as_millis(), 5000);
        assert_eq!(config.delay_for_attempt(60).as_millis(), 5000);
    }

    #[test]
    fn jitter_stays_in_band() {
        let config = RetryConfig {
            initial_delay_ms: 1000,
            max_delay_ms: 1000,
            jitter_factor: 0.1,
            ..RetryConfig::default()
        };

        for _ in 0..20 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((900..=1100).contains(&ms), "delay_ms={ms} out of range");
        }
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: RetryConfig = serde_json::from_str(r#"{"max_retries":3}"#).unwrap();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay_ms, 500);
    }

    #[test]
    fn weather_errors_follow_transient_classification() {
        assert!(WeatherError::ServiceUnavailable("HTTP 500".into()).is_retryable());
        assert!(WeatherError::Timeout(30).is_retryable());
        assert!(!WeatherError::ParseError("bad".into()).is_retryable());
        assert!(!WeatherError::RequestFailed("HTTP 404".into()).is_retryable());
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = with_retry(&quick(1), || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(WeatherError::ServiceUnavailable("HTTP 503".into()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.attempts, 2);
        assert_eq!(result.into_result().unwrap(), 7);
    }

    #[tokio::test]
    async fn persistent_failure_surfaces_after_retries() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = with_retry(&quick(2), || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(WeatherError::ServiceUnavailable("HTTP 500".into()))
            }
        })
        .await;

        assert_eq!(result.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result.result,
            Err(WeatherError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), WeatherError> = retry(&quick(5), || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(WeatherError::ParseError("unexpected body".into()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = with_retry(&quick(0), || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(WeatherError::Timeout(1))
            }
        })
        .await;

        assert_eq!(result.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
