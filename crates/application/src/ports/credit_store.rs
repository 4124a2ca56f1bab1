//! Credit store port - persisted per-provider quota state
//!
//! All cross-request coordination state lives behind this port. Mutating
//! operations that race between requests (`disable_provider`, `add_usage`)
//! must be implemented as server-side atomic updates, never as caller-side
//! read-modify-write round trips.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Codename, ProviderRecord, UsageRecord};
use thiserror::Error;

/// Errors from the credit store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Provider row does not exist
    #[error("Provider not found: {0}")]
    NotFound(Codename),

    /// Underlying storage failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Port for the persisted credit state
#[async_trait]
pub trait CreditStorePort: Send + Sync {
    /// Load every provider record
    async fn list_providers(&self) -> Result<Vec<ProviderRecord>, StoreError>;

    /// Load the records for a candidate set.
    ///
    /// Result order is unspecified; callers must not derive priority from it.
    async fn get_providers(
        &self,
        codenames: &[Codename],
    ) -> Result<Vec<ProviderRecord>, StoreError>;

    /// Persist a full record (gate/monitor updates)
    async fn save_provider(&self, record: &ProviderRecord) -> Result<(), StoreError>;

    /// Atomically flip `credit_status` to false (single-strike breaker)
    async fn disable_provider(&self, codename: Codename, now: DateTime<Utc>)
    -> Result<(), StoreError>;

    /// Atomically increment the aggregate counters: `daily_usage` by
    /// `requests_made`, `monthly_usage` by `tokens_used`
    async fn add_usage(
        &self,
        codename: Codename,
        requests_made: u64,
        tokens_used: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Append one usage log entry
    async fn insert_usage_record(&self, record: &UsageRecord) -> Result<(), StoreError>;

    /// Zero all counters and re-enable every provider
    async fn reset_all(&self, now: DateTime<Utc>) -> Result<(), StoreError>;
}
