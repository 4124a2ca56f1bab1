//! Usage tracking service
//!
//! Records every successful provider call twice: an append-only log entry
//! for auditing and a server-side increment of the aggregate counters that
//! feed the availability gate.

use std::sync::Arc;

use chrono::Utc;
use domain::{Codename, SessionId, UsageRecord};
use tracing::instrument;

use crate::ports::{CreditStorePort, StoreError};

/// Tracks usage of provider calls against the credit store
#[derive(Clone)]
pub struct UsageTracker {
    store: Arc<dyn CreditStorePort>,
}

impl UsageTracker {
    /// Create a tracker backed by the given store
    #[must_use]
    pub fn new(store: Arc<dyn CreditStorePort>) -> Self {
        Self { store }
    }

    /// Record one completed call.
    ///
    /// The log insert and the counter increment are two separate store
    /// operations, not a transaction. A crash between them loses the
    /// increment but never the log entry, so the log stays the ground truth.
    #[instrument(skip(self), fields(provider = %provider))]
    pub async fn track(
        &self,
        provider: Codename,
        session: SessionId,
        requests_made: u64,
        tokens_used: u64,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let record = UsageRecord::new(provider, session, requests_made, tokens_used, now);
        self.store.insert_usage_record(&record).await?;
        self.store
            .add_usage(provider, requests_made, tokens_used, now)
            .await
    }
}
