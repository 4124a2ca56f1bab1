//! Provider endpoint configuration

use secrecy::SecretString;
use serde::Deserialize;

/// Settings for one provider endpoint.
///
/// A missing `api_key` leaves the adapter unconfigured; the orchestrator
/// skips it without counting a failure. Nova is the exception and never
/// needs a key.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEndpointConfig {
    /// Base URL of the provider API
    pub base_url: String,

    /// API key, absent when the provider is not set up
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Model identifier sent with each request
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Default voice for synthesis providers
    #[serde(default)]
    pub voice: Option<String>,
}

const fn default_timeout_ms() -> u64 {
    30_000
}

impl ProviderEndpointConfig {
    fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: None,
            model: model.to_string(),
            timeout_ms: default_timeout_ms(),
            voice: None,
        }
    }

    fn with_voice(mut self, voice: &str) -> Self {
        self.voice = Some(voice.to_string());
        self
    }
}

/// Endpoint settings for all seven providers
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    /// Orion question generation (chat-completions dialect)
    #[serde(default = "default_orion")]
    pub orion: ProviderEndpointConfig,

    /// Titan question generation (generateContent dialect)
    #[serde(default = "default_titan")]
    pub titan: ProviderEndpointConfig,

    /// Nova question generation (self-hosted, keyless)
    #[serde(default = "default_nova")]
    pub nova: ProviderEndpointConfig,

    /// Athena response evaluation (chat-completions dialect)
    #[serde(default = "default_athena")]
    pub athena: ProviderEndpointConfig,

    /// Vox speech synthesis (JSON, returns an audio URL)
    #[serde(default = "default_vox")]
    pub vox: ProviderEndpointConfig,

    /// Aether speech synthesis (raw audio bytes)
    #[serde(default = "default_aether")]
    pub aether: ProviderEndpointConfig,

    /// Echo transcription (multipart upload)
    #[serde(default = "default_echo")]
    pub echo: ProviderEndpointConfig,
}

fn default_orion() -> ProviderEndpointConfig {
    ProviderEndpointConfig::new("https://api.orion-ai.example/v1", "orion-chat")
}

fn default_titan() -> ProviderEndpointConfig {
    ProviderEndpointConfig::new("https://api.titan-ai.example/v1beta", "titan-pro")
}

fn default_nova() -> ProviderEndpointConfig {
    ProviderEndpointConfig::new("http://localhost:11434", "nova-8b")
}

fn default_athena() -> ProviderEndpointConfig {
    ProviderEndpointConfig::new("https://api.athena-ai.example/v1", "athena-judge")
}

fn default_vox() -> ProviderEndpointConfig {
    ProviderEndpointConfig::new("https://api.vox-speech.example/v1", "vox-tts-1").with_voice("aria")
}

fn default_aether() -> ProviderEndpointConfig {
    ProviderEndpointConfig::new("https://api.aether-voice.example/v1", "aether-voice")
        .with_voice("sol")
}

fn default_echo() -> ProviderEndpointConfig {
    ProviderEndpointConfig::new("https://api.echo-stt.example/v1", "echo-whisper")
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            orion: default_orion(),
            titan: default_titan(),
            nova: default_nova(),
            athena: default_athena(),
            vox: default_vox(),
            aether: default_aether(),
            echo: default_echo(),
        }
    }
}
