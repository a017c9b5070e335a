//! Daily weather store port
//!
//! Defines the persistence interface for daily averages keyed by
//! `(date, city)`.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::DailyAverage;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Outcome of a successful batch upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertSummary {
    /// Number of records written (inserted or overwritten)
    pub records: usize,
}

impl UpsertSummary {
    #[must_use]
    pub const fn new(records: usize) -> Self {
        Self { records }
    }

    /// True when the batch was empty and nothing was written
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/// Port for daily average persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DailyWeatherStore: Send + Sync {
    /// Insert or overwrite each record using `(date, city)` as the key
    ///
    /// The batch is applied as one unit: on failure nothing is committed and
    /// the error reports the offending record. An empty batch is a no-op.
    async fn upsert_batch(
        &self,
        records: &[DailyAverage],
    ) -> Result<UpsertSummary, ApplicationError>;

    /// Read back one record by key
    async fn get(
        &self,
        date: NaiveDate,
        city: &str,
    ) -> Result<Option<DailyAverage>, ApplicationError>;

    /// Most recent records for a city, oldest first
    async fn list_for_city(
        &self,
        city: &str,
        limit: u32,
    ) -> Result<Vec<DailyAverage>, ApplicationError>;

    /// Total number of stored records
    async fn count(&self) -> Result<u64, ApplicationError>;
}
