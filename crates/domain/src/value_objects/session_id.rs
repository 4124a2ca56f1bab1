//! Session identifier for usage attribution

use serde::{Deserialize, Serialize};

/// Opaque identifier of one interview practice session.
///
/// Supplied by the client; usage records are attributed to it. Requests
/// without a session identifier fall back to [`SessionId::anonymous`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session id from a client-supplied value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Placeholder id for requests without session attribution
    #[must_use]
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    /// The raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
