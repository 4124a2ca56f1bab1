//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Provider codename is not one of the known providers
    #[error("Unknown provider codename: {0}")]
    UnknownCodename(String),

    /// Request context carried an invalid value
    #[error("Invalid request context: {0}")]
    InvalidContext(String),
}
