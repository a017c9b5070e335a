//! Application-level errors
//!
//! One variant per pipeline failure class. Every stage either completes its
//! unit of work or returns one of these; the pipeline runner maps them to a
//! failed run.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// Bad input detected before any I/O
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Extraction failed for one city (network, HTTP status or response schema)
    #[error("Source unavailable for {city}: {cause}")]
    SourceUnavailable { city: String, cause: String },

    /// A reading could not be interpreted during aggregation
    #[error("Malformed data in {record}: {reason}")]
    MalformedData { record: String, reason: String },

    /// The store rejected or failed a batch
    ///
    /// `applied` is the number of records durably written before the failure.
    #[error(
        "Persistence error at {}: {cause} ({applied} records applied)",
        .record.as_deref().unwrap_or("batch")
    )]
    Persistence {
        record: Option<String>,
        cause: String,
        applied: usize,
    },
}

impl ApplicationError {
    /// Create a source unavailable error
    pub fn source_unavailable(city: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            city: city.into(),
            cause: cause.into(),
        }
    }

    /// Create a malformed data error
    pub fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedData {
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// Create a persistence error for a whole batch with nothing applied
    pub fn persistence(cause: impl Into<String>) -> Self {
        Self::Persistence {
            record: None,
            cause: cause.into(),
            applied: 0,
        }
    }

    /// Create a persistence error pointing at one record
    pub fn persistence_at(record: impl Into<String>, cause: impl Into<String>, applied: usize) -> Self {
        Self::Persistence {
            record: Some(record.into()),
            cause: cause.into(),
            applied,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}

impl From<DomainError> for ApplicationError {
    fn from(e: DomainError) -> Self {
        Self::Configuration(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_message_names_city() {
        let err = ApplicationError::source_unavailable("Kumasi", "HTTP 500");
        assert_eq!(err.to_string(), "Source unavailable for Kumasi: HTTP 500");
    }

    #[test]
    fn malformed_data_message() {
        let err = ApplicationError::malformed("reading #3", "invalid timestamp 'x'");
        assert_eq!(
            err.to_string(),
            "Malformed data in reading #3: invalid timestamp 'x'"
        );
    }

    #[test]
    fn persistence_message_for_batch() {
        let err = ApplicationError::persistence("connection refused");
        assert_eq!(
            err.to_string(),
            "Persistence error at batch: connection refused (0 records applied)"
        );
    }

    #[test]
    fn persistence_message_for_record() {
        let err = ApplicationError::persistence_at("2024-01-01/Accra", "constraint failed", 0);
        assert!(err.to_string().contains("2024-01-01/Accra"));
        assert!(err.to_string().contains("constraint failed"));
    }

    #[test]
    fn domain_errors_become_configuration_errors() {
        let err: ApplicationError = DomainError::invalid_coordinates("Accra", 99.0, 0.0).into();
        assert!(matches!(err, ApplicationError::Configuration(_)));
        assert!(err.to_string().contains("Accra"));
    }

    #[test]
    fn only_source_errors_are_retryable() {
        assert!(ApplicationError::source_unavailable("Accra", "timeout").is_retryable());
        assert!(!ApplicationError::Configuration("x".into()).is_retryable());
        assert!(!ApplicationError::malformed("r", "x").is_retryable());
        assert!(!ApplicationError::persistence("x").is_retryable());
    }
}
