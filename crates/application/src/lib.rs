//! Application layer for Parley
//!
//! Orchestrates provider routing over the ports defined here: the credit
//! store, the four capability adapter ports, and the services that implement
//! the availability-gated attempt loop, usage tracking, and credit
//! monitoring.

pub mod context;
pub mod error;
pub mod ports;
pub mod services;

pub use context::InterviewContext;
pub use error::ApplicationError;
pub use services::{
    CreditCheckReport, CreditMonitor, EvaluationOutcome, ExhaustedProvider, InterviewOrchestrator,
    ModelStatusEntry, ProviderRoster, QuestionOutcome, SpeechOutcome, TranscriptOutcome,
    UsageTracker,
};
