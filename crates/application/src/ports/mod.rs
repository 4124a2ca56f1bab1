//! Ports - Interfaces the application layer depends on
//!
//! Infrastructure provides the implementations: the SQLite credit store and
//! one HTTP adapter per provider.

mod credit_store;
mod evaluation_port;
mod question_port;
mod speech_port;

use domain::Codename;
use thiserror::Error;

pub use credit_store::{CreditStorePort, StoreError};
pub use evaluation_port::EvaluationPort;
pub use question_port::{GeneratedQuestion, QuestionGeneratorPort};
pub use speech_port::{SpeechSynthesisPort, SynthesizedSpeech, Transcript, TranscriptionPort};

/// Error returned by a provider adapter for a single call.
///
/// Recovered locally by the orchestrator's single-strike breaker; never
/// surfaced to clients directly.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Required credential is not configured
    #[error("Provider credentials are not configured")]
    MissingCredentials,

    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// Provider returned a non-2xx response
    #[error("Provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Provider returned a 2xx response the adapter could not interpret
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Common surface of every provider adapter.
///
/// The orchestrator routes over `(codename, is_configured, adapter)`; an
/// unconfigured adapter is skipped without counting as a failure.
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter calls
    fn codename(&self) -> Codename;

    /// Whether the external configuration required for a call is present
    fn is_configured(&self) -> bool;
}
