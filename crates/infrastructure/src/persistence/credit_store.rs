//! SQLite-backed credit store
//!
//! All mutating statements that race between requests (the breaker flip and
//! the usage increments) are single server-side UPDATEs, never caller-side
//! read-modify-write round trips.

use std::sync::Arc;

use application::ports::{CreditStorePort, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Codename, ProviderRecord, UsageRecord};
use rusqlite::{Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// SQLite-based credit store
#[derive(Debug, Clone)]
pub struct SqliteCreditStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteCreditStore {
    /// Create a new SQLite credit store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

const PROVIDER_COLUMNS: &str = "codename, credit_status, daily_usage, monthly_usage,
     daily_limit, monthly_limit, last_reset_daily, last_reset_monthly, last_checked";

#[async_trait]
impl CreditStorePort for SqliteCreditStore {
    #[instrument(skip(self))]
    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, StoreError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(backend)?;
            let mut stmt = conn
                .prepare(&format!("SELECT {PROVIDER_COLUMNS} FROM providers"))
                .map_err(backend)?;
            let records: Vec<ProviderRecord> = stmt
                .query_map([], row_to_record)
                .map_err(backend)?
                .filter_map(Result::ok)
                .collect();
            Ok(records)
        })
        .await
        .map_err(backend)?
    }

    #[instrument(skip(self))]
    async fn get_providers(
        &self,
        codenames: &[Codename],
    ) -> Result<Vec<ProviderRecord>, StoreError> {
        let pool = Arc::clone(&self.pool);
        let names: Vec<String> = codenames.iter().map(|c| c.as_str().to_string()).collect();

        task::spawn_blocking(move || {
            if names.is_empty() {
                return Ok(Vec::new());
            }
            let conn = pool.get().map_err(backend)?;

            let placeholders: Vec<String> =
                (1..=names.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "SELECT {PROVIDER_COLUMNS} FROM providers WHERE codename IN ({})",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql).map_err(backend)?;
            let params_refs: Vec<&dyn rusqlite::types::ToSql> = names
                .iter()
                .map(|s| s as &dyn rusqlite::types::ToSql)
                .collect();
            let records: Vec<ProviderRecord> = stmt
                .query_map(params_refs.as_slice(), row_to_record)
                .map_err(backend)?
                .filter_map(Result::ok)
                .collect();
            Ok(records)
        })
        .await
        .map_err(backend)?
    }

    #[instrument(skip(self, record), fields(provider = %record.codename))]
    async fn save_provider(&self, record: &ProviderRecord) -> Result<(), StoreError> {
        let pool = Arc::clone(&self.pool);
        let record = record.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(backend)?;

            #[allow(clippy::cast_possible_wrap)] // counters are far below i64::MAX
            let affected = conn
                .execute(
                    "UPDATE providers SET
                        credit_status = ?1, daily_usage = ?2, monthly_usage = ?3,
                        daily_limit = ?4, monthly_limit = ?5,
                        last_reset_daily = ?6, last_reset_monthly = ?7, last_checked = ?8
                     WHERE codename = ?9",
                    params![
                        i64::from(record.credit_status),
                        record.daily_usage as i64,
                        record.monthly_usage as i64,
                        record.daily_limit as i64,
                        record.monthly_limit as i64,
                        record.last_reset_daily.to_rfc3339(),
                        record.last_reset_monthly.to_rfc3339(),
                        record.last_checked.to_rfc3339(),
                        record.codename.as_str(),
                    ],
                )
                .map_err(backend)?;

            if affected == 0 {
                return Err(StoreError::NotFound(record.codename));
            }

            debug!("Saved provider record");
            Ok(())
        })
        .await
        .map_err(backend)?
    }

    #[instrument(skip(self), fields(provider = %codename))]
    async fn disable_provider(
        &self,
        codename: Codename,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(backend)?;

            let affected = conn
                .execute(
                    "UPDATE providers SET credit_status = 0, last_checked = ?1
                     WHERE codename = ?2",
                    params![now.to_rfc3339(), codename.as_str()],
                )
                .map_err(backend)?;

            if affected == 0 {
                return Err(StoreError::NotFound(codename));
            }

            debug!("Disabled provider");
            Ok(())
        })
        .await
        .map_err(backend)?
    }

    #[instrument(skip(self), fields(provider = %codename))]
    async fn add_usage(
        &self,
        codename: Codename,
        requests_made: u64,
        tokens_used: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(backend)?;

            #[allow(clippy::cast_possible_wrap)] // per-call usage is tiny
            let affected = conn
                .execute(
                    "UPDATE providers SET
                        daily_usage = daily_usage + ?1,
                        monthly_usage = monthly_usage + ?2,
                        last_checked = ?3
                     WHERE codename = ?4",
                    params![
                        requests_made as i64,
                        tokens_used as i64,
                        now.to_rfc3339(),
                        codename.as_str(),
                    ],
                )
                .map_err(backend)?;

            if affected == 0 {
                return Err(StoreError::NotFound(codename));
            }

            Ok(())
        })
        .await
        .map_err(backend)?
    }

    #[instrument(skip(self, record), fields(provider = %record.provider))]
    async fn insert_usage_record(&self, record: &UsageRecord) -> Result<(), StoreError> {
        let pool = Arc::clone(&self.pool);
        let record = record.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(backend)?;

            #[allow(clippy::cast_possible_wrap)] // per-call usage is tiny
            conn.execute(
                "INSERT INTO usage_log (provider, session_id, requests_made, tokens_used, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.provider.as_str(),
                    record.session_id.as_str(),
                    record.requests_made as i64,
                    record.tokens_used as i64,
                    record.timestamp.to_rfc3339(),
                ],
            )
            .map_err(backend)?;

            Ok(())
        })
        .await
        .map_err(backend)?
    }

    #[instrument(skip(self))]
    async fn reset_all(&self, now: DateTime<Utc>) -> Result<(), StoreError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(backend)?;

            conn.execute(
                "UPDATE providers SET
                    credit_status = 1, daily_usage = 0, monthly_usage = 0,
                    last_reset_daily = ?1, last_reset_monthly = ?1, last_checked = ?1",
                params![now.to_rfc3339()],
            )
            .map_err(backend)?;

            debug!("Reset all provider credits");
            Ok(())
        })
        .await
        .map_err(backend)?
    }
}

/// Map any backend-level failure to the opaque store error
fn backend<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Convert a database row to a `ProviderRecord`
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ProviderRecord> {
    let codename_str: String = row.get(0)?;
    let credit_status: i64 = row.get(1)?;
    let daily_usage: i64 = row.get(2)?;
    let monthly_usage: i64 = row.get(3)?;
    let daily_limit: i64 = row.get(4)?;
    let monthly_limit: i64 = row.get(5)?;
    let last_reset_daily: String = row.get(6)?;
    let last_reset_monthly: String = row.get(7)?;
    let last_checked: String = row.get(8)?;

    let codename = codename_str.parse::<Codename>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    #[allow(clippy::cast_sign_loss)] // counters are stored non-negative
    Ok(ProviderRecord {
        codename,
        credit_status: credit_status != 0,
        daily_usage: daily_usage as u64,
        monthly_usage: monthly_usage as u64,
        daily_limit: daily_limit as u64,
        monthly_limit: monthly_limit as u64,
        last_reset_daily: parse_timestamp(&last_reset_daily),
        last_reset_monthly: parse_timestamp(&last_reset_monthly),
        last_checked: parse_timestamp(&last_checked),
    })
}

/// Parse a stored RFC 3339 timestamp, falling back to now for corrupt rows
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
