//! Credit monitoring service
//!
//! Runs the availability gate across every provider record, persists the
//! records it changed, and answers the credit management operations: full
//! status reports, manual resets, and the exhausted-provider listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::{Codename, ProviderRecord};
use tracing::{info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::CreditStorePort;

/// Reason string for a provider that was switched off by the call breaker
/// rather than by a quota. Its counters are clean, so no limit reason fits.
const BREAKER_REASON: &str = "Disabled after call failure";

/// One provider that is currently not eligible
#[derive(Debug, Clone)]
pub struct ExhaustedProvider {
    /// Provider codename
    pub codename: Codename,
    /// Human-readable provider name
    pub name: String,
    /// Requests made in the current daily window
    pub daily_usage: u64,
    /// Tokens used in the current monthly window
    pub monthly_usage: u64,
    /// Daily request limit
    pub daily_limit: u64,
    /// Monthly token limit
    pub monthly_limit: u64,
    /// Why the provider is off
    pub reason: String,
}

impl ExhaustedProvider {
    fn from_record(record: &ProviderRecord, reason: String) -> Self {
        Self {
            codename: record.codename,
            name: record.codename.label().to_string(),
            daily_usage: record.daily_usage,
            monthly_usage: record.monthly_usage,
            daily_limit: record.daily_limit,
            monthly_limit: record.monthly_limit,
            reason,
        }
    }
}

/// Result of a full credit check pass
#[derive(Debug, Clone)]
pub struct CreditCheckReport {
    /// When the check ran
    pub checked_at: DateTime<Utc>,
    /// Post-check state of every provider, in [`Codename::ALL`] order
    pub providers: Vec<ProviderRecord>,
    /// Providers that this pass flipped from eligible to exhausted
    pub newly_exhausted: Vec<ExhaustedProvider>,
    /// How many records this pass changed and persisted
    pub updated: usize,
}

/// Service for credit state management across all providers
#[derive(Clone)]
pub struct CreditMonitor {
    store: Arc<dyn CreditStorePort>,
}

impl CreditMonitor {
    /// Create a monitor backed by the given store
    #[must_use]
    pub fn new(store: Arc<dyn CreditStorePort>) -> Self {
        Self { store }
    }

    /// Evaluate the availability gate for every provider and persist changes
    #[instrument(skip(self))]
    pub async fn check_credits(&self) -> Result<CreditCheckReport, ApplicationError> {
        let now = Utc::now();
        let mut records = self.store.list_providers().await?;
        let mut newly_exhausted = Vec::new();
        let mut updated = 0;

        for record in &mut records {
            let outcome = record.evaluate(now);
            if let Some(reason) = outcome.newly_exhausted {
                warn!(provider = %record.codename, %reason, "provider exhausted");
                newly_exhausted.push(ExhaustedProvider::from_record(
                    record,
                    reason.as_str().to_string(),
                ));
            }
            if outcome.changed {
                self.store.save_provider(record).await?;
                updated += 1;
            }
        }

        records.sort_by_key(|r| Codename::ALL.iter().position(|c| *c == r.codename));

        Ok(CreditCheckReport {
            checked_at: now,
            providers: records,
            newly_exhausted,
            updated,
        })
    }

    /// Zero every counter and re-enable every provider
    #[instrument(skip(self))]
    pub async fn reset_credits(&self) -> Result<(), ApplicationError> {
        let now = Utc::now();
        self.store.reset_all(now).await?;
        info!("all provider credits reset");
        Ok(())
    }

    /// List the providers that are currently not eligible, with the reason.
    ///
    /// Runs the gate first so an elapsed window never reports a stale
    /// exhaustion. Quota reasons come from the record; a provider that is off
    /// with clean counters was tripped by the breaker.
    #[instrument(skip(self))]
    pub async fn exhausted_providers(&self) -> Result<Vec<ExhaustedProvider>, ApplicationError> {
        let report = self.check_credits().await?;
        let exhausted = report
            .providers
            .iter()
            .filter(|r| !r.credit_status)
            .map(|r| {
                let reason = r
                    .exhaustion_reason()
                    .map_or_else(|| BREAKER_REASON.to_string(), |rs| rs.as_str().to_string());
                ExhaustedProvider::from_record(r, reason)
            })
            .collect();
        Ok(exhausted)
    }
}
