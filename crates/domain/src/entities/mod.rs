//! Domain entities

mod evaluation;
mod provider_record;
mod usage_record;

pub use evaluation::{EvaluationScores, ResponseEvaluation};
pub use provider_record::{ExhaustionReason, GateOutcome, ProviderRecord};
pub use usage_record::UsageRecord;
