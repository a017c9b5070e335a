//! SQL and row mapping shared by the SQLite and PostgreSQL stores
//!
//! Statements use `$n` placeholders, which both backends accept.

use application::error::ApplicationError;
use chrono::NaiveDate;
use domain::{DailyAverage, MAX_CITY_NAME_LEN};

use super::error::record_key;

pub(crate) const UPSERT_SQL: &str = "INSERT INTO weather_daily (date, temperature, city) \
     VALUES ($1, $2, $3) \
     ON CONFLICT (date, city) DO UPDATE SET temperature = excluded.temperature";

pub(crate) const SELECT_ONE_SQL: &str =
    "SELECT date, temperature, city FROM weather_daily WHERE date = $1 AND city = $2";

/// Latest `$2` rows for a city, returned oldest first
pub(crate) const LIST_FOR_CITY_SQL: &str = "SELECT date, temperature, city FROM (\
     SELECT date, temperature, city FROM weather_daily \
     WHERE city = $1 ORDER BY date DESC LIMIT $2\
     ) AS recent ORDER BY date ASC";

pub(crate) const COUNT_SQL: &str = "SELECT COUNT(*) FROM weather_daily";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DailyRow {
    pub date: NaiveDate,
    pub temperature: Option<f64>,
    pub city: String,
}

impl From<DailyRow> for DailyAverage {
    fn from(row: DailyRow) -> Self {
        Self::new(row.date, row.city, row.temperature)
    }
}

/// Reject records the table cannot hold, before any transaction is opened
pub(crate) fn validate_batch(records: &[DailyAverage]) -> Result<(), ApplicationError> {
    for record in records {
        let reason = if record.city.trim().is_empty() {
            Some("city name is empty".to_string())
        } else if record.city.chars().count() > MAX_CITY_NAME_LEN {
            Some(format!("city name exceeds {MAX_CITY_NAME_LEN} characters"))
        } else if record.temperature.is_some_and(|t| !t.is_finite()) {
            Some("temperature is not a finite number".to_string())
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(ApplicationError::persistence_at(record_key(record), reason, 0));
        }
    }
    Ok(())
}
