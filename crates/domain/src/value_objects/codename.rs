//! Provider codenames - stable identifiers for the external providers

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Stable identifier for one external provider/capability unit.
///
/// The set of providers is closed: routing decisions branch on these
/// variants, never on raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codename {
    /// Primary question generation provider
    Orion,
    /// Secondary question generation provider
    Titan,
    /// Tertiary question generation provider (self-hosted, no API key)
    Nova,
    /// Response evaluation provider
    Athena,
    /// Primary text-to-speech provider
    Vox,
    /// Secondary text-to-speech provider
    Aether,
    /// Speech-to-text provider
    Echo,
}

impl Codename {
    /// All providers, in the canonical status-reporting order
    pub const ALL: [Self; 7] = [
        Self::Orion,
        Self::Titan,
        Self::Nova,
        Self::Athena,
        Self::Vox,
        Self::Aether,
        Self::Echo,
    ];

    /// The codename as it appears in the store and on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Orion => "Orion",
            Self::Titan => "Titan",
            Self::Nova => "Nova",
            Self::Athena => "Athena",
            Self::Vox => "Vox",
            Self::Aether => "Aether",
            Self::Echo => "Echo",
        }
    }

    /// Human-readable provider name
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Orion => "Orion (question generation)",
            Self::Titan => "Titan (question generation)",
            Self::Nova => "Nova (question generation)",
            Self::Athena => "Athena (response evaluation)",
            Self::Vox => "Vox (speech synthesis)",
            Self::Aether => "Aether (speech synthesis)",
            Self::Echo => "Echo (transcription)",
        }
    }
}

impl std::fmt::Display for Codename {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Codename {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Orion" => Ok(Self::Orion),
            "Titan" => Ok(Self::Titan),
            "Nova" => Ok(Self::Nova),
            "Athena" => Ok(Self::Athena),
            "Vox" => Ok(Self::Vox),
            "Aether" => Ok(Self::Aether),
            "Echo" => Ok(Self::Echo),
            other => Err(DomainError::UnknownCodename(other.to_string())),
        }
    }
}
