//! Speech ports - synthesis and transcription

use async_trait::async_trait;

use super::{ProviderAdapter, ProviderError};

/// Result of a speech synthesis call
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    /// URL the client can fetch or play the audio from (may be a data URL)
    pub audio_url: String,
}

/// Port for text-to-speech providers
#[async_trait]
pub trait SpeechSynthesisPort: ProviderAdapter {
    /// Synthesize `text` into audio, optionally with a specific voice
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SynthesizedSpeech, ProviderError>;
}

/// Result of a transcription call
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Transcribed text
    pub text: String,
}

/// Port for speech-to-text providers.
///
/// Callers hand over decoded audio bytes; payload validation happens before
/// any provider is selected, so an adapter error here always reflects an
/// observed provider call failure.
#[async_trait]
pub trait TranscriptionPort: ProviderAdapter {
    /// Transcribe raw audio into text
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, ProviderError>;
}
