//! Capabilities and their fixed provider priority lists

use serde::{Deserialize, Serialize};

use super::Codename;

/// One routed capability of the service.
///
/// Each capability carries a hard-coded candidate list in priority order.
/// The store only ever filters this list; it never reorders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Generate the next interview question
    QuestionGeneration,
    /// Synthesize a question into audio
    SpeechSynthesis,
    /// Transcribe candidate audio into text
    Transcription,
    /// Score a candidate response
    Evaluation,
}

impl Capability {
    /// Candidate providers for this capability, highest priority first
    #[must_use]
    pub const fn candidates(self) -> &'static [Codename] {
        match self {
            Self::QuestionGeneration => &[Codename::Orion, Codename::Titan, Codename::Nova],
            Self::SpeechSynthesis => &[Codename::Vox, Codename::Aether],
            Self::Transcription => &[Codename::Echo],
            Self::Evaluation => &[Codename::Athena],
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::QuestionGeneration => "question generation",
            Self::SpeechSynthesis => "speech synthesis",
            Self::Transcription => "transcription",
            Self::Evaluation => "evaluation",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
