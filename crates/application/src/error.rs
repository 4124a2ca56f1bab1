//! Application-level errors

use domain::{Capability, Codename, DomainError};
use thiserror::Error;

use crate::ports::StoreError;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Credit store failure
    #[error("Credit store error: {0}")]
    Store(#[from] StoreError),

    /// No candidate provider currently has credit
    #[error("No providers available for {capability}")]
    NoProvidersAvailable {
        capability: Capability,
        unavailable: Vec<Codename>,
    },

    /// Every eligible candidate was attempted and failed
    #[error("All {capability} providers failed")]
    AllProvidersFailed {
        capability: Capability,
        attempted: Vec<Codename>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether this error has a defined degradation path instead of a
    /// hard failure (fallback content, browser-side synthesis)
    #[must_use]
    pub const fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::NoProvidersAvailable { .. } | Self::AllProvidersFailed { .. }
        )
    }
}
