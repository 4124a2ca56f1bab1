//! Usage record entity - append-only evidence of provider calls

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Codename, SessionId};

/// One append-only usage log entry.
///
/// Written once per successful provider call, never mutated or deleted. The
/// aggregate counters on [`crate::ProviderRecord`] are derived increments;
/// this log is the ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Provider that served the call
    pub provider: Codename,
    /// Session the call belonged to
    pub session_id: SessionId,
    /// Requests made in this call (normally 1)
    pub requests_made: u64,
    /// Tokens consumed, 0 when the provider does not report usage
    pub tokens_used: u64,
    /// When the call completed
    pub timestamp: DateTime<Utc>,
}

impl UsageRecord {
    /// Create a usage record for a completed call
    #[must_use]
    pub fn new(
        provider: Codename,
        session_id: SessionId,
        requests_made: u64,
        tokens_used: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            provider,
            session_id,
            requests_made,
            tokens_used,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn constructs_with_all_fields() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
        let rec = UsageRecord::new(Codename::Nova, SessionId::new("s1"), 1, 240, ts);
        assert_eq!(rec.provider, Codename::Nova);
        assert_eq!(rec.session_id.as_str(), "s1");
        assert_eq!(rec.requests_made, 1);
        assert_eq!(rec.tokens_used, 240);
        assert_eq!(rec.timestamp, ts);
    }
}
