//! Shared error mapping for the sqlx persistence layer

use application::error::ApplicationError;
use domain::DailyAverage;

/// Error type for connecting to and migrating the database
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The URL is unusable (unknown scheme, invalid options)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<DatabaseError> for ApplicationError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::Config(msg) => Self::Configuration(msg),
            other => Self::persistence(other.to_string()),
        }
    }
}

/// Key used to point at a record in error messages
pub(crate) fn record_key(record: &DailyAverage) -> String {
    format!("{}/{}", record.date, record.city)
}

/// Map a sqlx error raised for the whole batch (begin, commit, reads)
pub(crate) fn map_sqlx_error(e: &sqlx::Error) -> ApplicationError {
    ApplicationError::persistence(describe(e))
}

/// Map a sqlx error raised while writing `record`
///
/// Nothing is committed when a statement fails, so `applied` is always 0.
pub(crate) fn map_sqlx_error_at(e: &sqlx::Error, record: &DailyAverage) -> ApplicationError {
    ApplicationError::persistence_at(record_key(record), describe(e), 0)
}

fn describe(e: &sqlx::Error) -> String {
    match e {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => format!("Database error [{code}]: {}", db_err.message()),
            None => format!("Database error: {}", db_err.message()),
        },
        sqlx::Error::PoolTimedOut => "Timed out waiting for a database connection".to_string(),
        other => format!("Database error: {other}"),
    }
}
