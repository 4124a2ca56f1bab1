//! Provider record entity and the availability gate
//!
//! A [`ProviderRecord`] is the persisted quota state of one provider. The
//! availability gate ([`ProviderRecord::evaluate`]) is a pure function of
//! `(now, record)`: it applies pending reset windows, re-evaluates exhaustion
//! against the post-reset counters, and reports whether anything changed.
//! Persistence is the caller's job.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Codename;

/// Which quota dimension disabled a provider.
///
/// When both limits are exceeded the daily reason wins. This tie-break is a
/// documented contract of the credit monitor and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionReason {
    /// Daily request quota met or exceeded
    Daily,
    /// Monthly token quota met or exceeded
    Monthly,
}

impl ExhaustionReason {
    /// The reason string reported to clients
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "Daily limit exceeded",
            Self::Monthly => "Monthly limit exceeded",
        }
    }
}

impl std::fmt::Display for ExhaustionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one availability gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    /// Whether the provider may be attempted after this evaluation
    pub eligible: bool,
    /// Whether any field changed and the record must be persisted
    pub changed: bool,
    /// Set when this evaluation flipped an eligible provider to exhausted
    pub newly_exhausted: Option<ExhaustionReason>,
}

/// Persisted quota state of one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Stable provider identifier
    pub codename: Codename,
    /// Whether the provider is currently eligible to be attempted
    pub credit_status: bool,
    /// Requests made in the current daily window
    pub daily_usage: u64,
    /// Tokens used in the current monthly window
    pub monthly_usage: u64,
    /// Daily request limit; 0 means unlimited
    pub daily_limit: u64,
    /// Monthly token limit; 0 means unlimited
    pub monthly_limit: u64,
    /// Start of the current daily counting window
    pub last_reset_daily: DateTime<Utc>,
    /// Start of the current monthly counting window
    pub last_reset_monthly: DateTime<Utc>,
    /// Time of the most recent state mutation
    pub last_checked: DateTime<Utc>,
}

impl ProviderRecord {
    /// Create a fresh, eligible record with zeroed counters
    #[must_use]
    pub fn new(
        codename: Codename,
        daily_limit: u64,
        monthly_limit: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            codename,
            credit_status: true,
            daily_usage: 0,
            monthly_usage: 0,
            daily_limit,
            monthly_limit,
            last_reset_daily: now,
            last_reset_monthly: now,
            last_checked: now,
        }
    }

    /// Whether the daily request quota is met or exceeded
    #[must_use]
    pub const fn daily_exceeded(&self) -> bool {
        self.daily_limit > 0 && self.daily_usage >= self.daily_limit
    }

    /// Whether the monthly token quota is met or exceeded
    #[must_use]
    pub const fn monthly_exceeded(&self) -> bool {
        self.monthly_limit > 0 && self.monthly_usage >= self.monthly_limit
    }

    /// The exceeded-limit reason, daily taking priority over monthly
    #[must_use]
    pub const fn exhaustion_reason(&self) -> Option<ExhaustionReason> {
        if self.daily_exceeded() {
            Some(ExhaustionReason::Daily)
        } else if self.monthly_exceeded() {
            Some(ExhaustionReason::Monthly)
        } else {
            None
        }
    }

    /// Evaluate the availability gate at `now`.
    ///
    /// Order matters: resets are applied first, then exhaustion is judged
    /// against the post-reset counters, so a provider whose window elapsed is
    /// never reported exhausted in the same evaluation. A provider that was
    /// ineligible only becomes eligible again when a reset occurred in this
    /// evaluation; a breaker-tripped provider with clean counters stays off
    /// until its next window.
    pub fn evaluate(&mut self, now: DateTime<Utc>) -> GateOutcome {
        let was_eligible = self.credit_status;
        let mut reset_occurred = false;

        if (now - self.last_reset_daily).num_days() >= 1 {
            self.daily_usage = 0;
            self.last_reset_daily = now;
            reset_occurred = true;
        }

        if months_between(self.last_reset_monthly, now) >= 1 {
            self.monthly_usage = 0;
            self.last_reset_monthly = now;
            reset_occurred = true;
        }

        let mut newly_exhausted = None;
        if let Some(reason) = self.exhaustion_reason() {
            self.credit_status = false;
            if was_eligible {
                newly_exhausted = Some(reason);
            }
        } else if !was_eligible && reset_occurred {
            self.credit_status = true;
        }

        let changed = reset_occurred || self.credit_status != was_eligible;
        if changed {
            self.last_checked = now;
        }

        GateOutcome {
            eligible: self.credit_status,
            changed,
            newly_exhausted,
        }
    }

    /// Unconditionally re-enable the provider and zero all counters
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.credit_status = true;
        self.daily_usage = 0;
        self.monthly_usage = 0;
        self.last_reset_daily = now;
        self.last_reset_monthly = now;
        self.last_checked = now;
    }
}

/// Calendar-month difference, ignoring day-of-month
fn months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i32 {
    let from_months = from.year() * 12 + from.month() as i32;
    let to_months = to.year() * 12 + to.month() as i32;
    to_months - from_months
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn record(now: DateTime<Utc>) -> ProviderRecord {
        ProviderRecord::new(Codename::Orion, 100, 1_000_000, now)
    }

    #[test]
    fn fresh_record_is_eligible_and_unchanged() {
        let now = at(2025, 6, 15);
        let mut rec = record(now);
        let outcome = rec.evaluate(now);
        assert!(outcome.eligible);
        assert!(!outcome.changed);
        assert!(outcome.newly_exhausted.is_none());
    }

    #[test]
    fn daily_limit_reached_disables_provider() {
        let now = at(2025, 6, 15);
        let mut rec = record(now);
        rec.daily_usage = 100;

        let outcome = rec.evaluate(now);
        assert!(!outcome.eligible);
        assert!(outcome.changed);
        assert_eq!(outcome.newly_exhausted, Some(ExhaustionReason::Daily));
        assert!(!rec.credit_status);
    }

    #[test]
    fn zero_limit_never_exhausts() {
        let now = at(2025, 6, 15);
        let mut rec = ProviderRecord::new(Codename::Aether, 0, 0, now);
        rec.daily_usage = 1_000_000;
        rec.monthly_usage = u64::MAX;

        let outcome = rec.evaluate(now);
        assert!(outcome.eligible);
    }

    #[test]
    fn daily_reason_wins_when_both_exceeded() {
        let now = at(2025, 6, 15);
        let mut rec = record(now);
        rec.daily_usage = 150;
        rec.monthly_usage = 2_000_000;

        let outcome = rec.evaluate(now);
        assert_eq!(outcome.newly_exhausted, Some(ExhaustionReason::Daily));
    }

    #[test]
    fn exhausted_event_only_fires_on_transition() {
        let now = at(2025, 6, 15);
        let mut rec = record(now);
        rec.daily_usage = 100;

        let first = rec.evaluate(now);
        assert!(first.newly_exhausted.is_some());

        let second = rec.evaluate(now);
        assert!(second.newly_exhausted.is_none());
        assert!(!second.changed);
    }

    #[test]
    fn daily_reset_zeroes_usage_and_reenables() {
        let start = at(2025, 6, 13);
        let now = at(2025, 6, 15);
        let mut rec = record(start);
        rec.daily_usage = 150;
        rec.credit_status = false;

        let outcome = rec.evaluate(now);
        assert_eq!(rec.daily_usage, 0);
        assert_eq!(rec.last_reset_daily, now);
        assert!(outcome.eligible);
        assert!(outcome.changed);
        assert!(outcome.newly_exhausted.is_none());
        assert_eq!(rec.last_checked, now);
    }

    #[test]
    fn reset_precedes_limit_check() {
        // Exhausted counters with an elapsed window must not report exhaustion.
        let start = at(2025, 6, 1);
        let now = at(2025, 6, 3);
        let mut rec = record(start);
        rec.daily_usage = 100;
        rec.credit_status = true;

        let outcome = rec.evaluate(now);
        assert!(outcome.eligible);
        assert!(outcome.newly_exhausted.is_none());
    }

    #[test]
    fn partial_day_does_not_reset() {
        let start = at(2025, 6, 15);
        let now = start + Duration::hours(23);
        let mut rec = record(start);
        rec.daily_usage = 42;

        rec.evaluate(now);
        assert_eq!(rec.daily_usage, 42);
        assert_eq!(rec.last_reset_daily, start);
    }

    #[test]
    fn monthly_reset_uses_calendar_months() {
        // May 31st to June 1st is one calendar month apart despite being a
        // single day of elapsed time.
        let start = at(2025, 5, 31);
        let now = at(2025, 6, 1);
        let mut rec = record(start);
        rec.monthly_usage = 900_000;

        rec.evaluate(now);
        assert_eq!(rec.monthly_usage, 0);
        assert_eq!(rec.last_reset_monthly, now);
    }

    #[test]
    fn monthly_diff_crosses_year_boundary() {
        let start = at(2024, 12, 15);
        let now = at(2025, 1, 2);
        let mut rec = record(start);
        rec.monthly_usage = 500;

        rec.evaluate(now);
        assert_eq!(rec.monthly_usage, 0);
    }

    #[test]
    fn breaker_tripped_provider_stays_off_without_reset() {
        let now = at(2025, 6, 15);
        let mut rec = record(now);
        rec.credit_status = false; // tripped by the breaker, counters clean

        let outcome = rec.evaluate(now);
        assert!(!outcome.eligible);
        assert!(!outcome.changed);
    }

    #[test]
    fn reset_reenables_everything() {
        let now = at(2025, 6, 15);
        let later = at(2025, 6, 16);
        let mut rec = record(now);
        rec.daily_usage = 150;
        rec.monthly_usage = 2_000_000;
        rec.credit_status = false;

        rec.reset(later);
        assert!(rec.credit_status);
        assert_eq!(rec.daily_usage, 0);
        assert_eq!(rec.monthly_usage, 0);
        assert_eq!(rec.last_reset_daily, later);
        assert_eq!(rec.last_reset_monthly, later);
        assert_eq!(rec.last_checked, later);
    }

    #[test]
    fn exhaustion_reason_none_when_under_limits() {
        let now = at(2025, 6, 15);
        let mut rec = record(now);
        rec.daily_usage = 99;
        rec.monthly_usage = 999_999;
        assert!(rec.exhaustion_reason().is_none());
        assert!(rec.evaluate(now).eligible);
    }
}
