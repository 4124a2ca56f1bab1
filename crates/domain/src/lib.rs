//! Domain layer for Parley
//!
//! Core business types for provider routing: provider records with the
//! availability gate, usage log entries, evaluation payloads, and the
//! deterministic fallback content. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod fallback;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use fallback::{FALLBACK_MODEL, FALLBACK_QUESTIONS, fallback_evaluation, fallback_question};
pub use value_objects::*;
