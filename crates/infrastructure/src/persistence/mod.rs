//! Persistence module
//!
//! sqlx-backed storage for daily weather averages, on SQLite or PostgreSQL.

pub mod connection;
mod error;
mod postgres_store;
mod schema;
mod sqlite_store;

pub use connection::{Database, DatabaseBackend, connect};
pub use error::DatabaseError;
pub use postgres_store::PgDailyWeatherStore;
pub use sqlite_store::SqliteDailyWeatherStore;
