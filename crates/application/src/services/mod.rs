//! Application services

mod credit_monitor;
mod orchestrator;
mod usage_tracker;

pub use credit_monitor::{CreditCheckReport, CreditMonitor, ExhaustedProvider};
pub use orchestrator::{
    EvaluationOutcome, InterviewOrchestrator, ModelStatusEntry, ProviderRoster, QuestionOutcome,
    SpeechOutcome, TranscriptOutcome,
};
pub use usage_tracker::UsageTracker;
