//! PostgreSQL implementation of `DailyWeatherStore`

use application::{
    error::ApplicationError,
    ports::{DailyWeatherStore, UpsertSummary},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::DailyAverage;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::{
    error::{map_sqlx_error, map_sqlx_error_at},
    schema::{
        COUNT_SQL, DailyRow, LIST_FOR_CITY_SQL, SELECT_ONE_SQL, UPSERT_SQL, validate_batch,
    },
};

/// Daily weather store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgDailyWeatherStore {
    pool: PgPool,
}

impl PgDailyWeatherStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyWeatherStore for PgDailyWeatherStore {
    #[instrument(skip(self, records), fields(records = records.len()))]
    async fn upsert_batch(
        &self,
        records: &[DailyAverage],
    ) -> Result<UpsertSummary, ApplicationError> {
        if records.is_empty() {
            return Ok(UpsertSummary::default());
        }
        validate_batch(records)?;

        let mut tx = self.pool.begin().await.map_err(|e| map_sqlx_error(&e))?;
        for record in records {
            sqlx::query(UPSERT_SQL)
                .bind(record.date)
                .bind(record.temperature)
                .bind(&record.city)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error_at(&e, record))?;
        }
        tx.commit().await.map_err(|e| map_sqlx_error(&e))?;

        debug!(records = records.len(), "Upserted daily averages");
        Ok(UpsertSummary::new(records.len()))
    }

    #[instrument(skip(self))]
    async fn get(
        &self,
        date: NaiveDate,
        city: &str,
    ) -> Result<Option<DailyAverage>, ApplicationError> {
        let row: Option<DailyRow> = sqlx::query_as(SELECT_ONE_SQL)
            .bind(date)
            .bind(city)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&e))?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_for_city(
        &self,
        city: &str,
        limit: u32,
    ) -> Result<Vec<DailyAverage>, ApplicationError> {
        let rows: Vec<DailyRow> = sqlx::query_as(LIST_FOR_CITY_SQL)
            .bind(city)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64, ApplicationError> {
        let count: i64 = sqlx::query_scalar(COUNT_SQL)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&e))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
