//! Aether speech synthesis adapter
//!
//! Returns raw audio bytes; the adapter wraps them into a base64 data URL so
//! the client needs no second fetch.

use application::ApplicationError;
use application::ports::{ProviderAdapter, ProviderError, SpeechSynthesisPort, SynthesizedSpeech};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use domain::Codename;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::ProviderEndpointConfig;

use super::{api_error, build_client, transport};

/// Adapter for the Aether TTS API
#[derive(Debug, Clone)]
pub struct AetherAdapter {
    client: Client,
    config: ProviderEndpointConfig,
}

impl AetherAdapter {
    /// Create the adapter from its endpoint configuration
    pub fn new(config: ProviderEndpointConfig) -> Result<Self, ApplicationError> {
        let client = build_client(config.timeout_ms)?;
        Ok(Self { client, config })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/synthesize", self.config.base_url)
    }
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    model: &'a str,
    text: &'a str,
    voice: &'a str,
}

impl ProviderAdapter for AetherAdapter {
    fn codename(&self) -> Codename {
        Codename::Aether
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl SpeechSynthesisPort for AetherAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SynthesizedSpeech, ProviderError> {
        let Some(key) = &self.config.api_key else {
            return Err(ProviderError::MissingCredentials);
        };

        let voice = voice
            .or(self.config.voice.as_deref())
            .unwrap_or("default");
        let request = SynthesizeRequest {
            model: &self.config.model,
            text,
            voice,
        };

        let response = self
            .client
            .post(self.synthesize_url())
            .bearer_auth(key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let audio = response.bytes().await.map_err(|e| transport(&e))?;
        if audio.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty audio body".to_string(),
            ));
        }

        debug!(audio_size = audio.len(), "Aether synthesized speech");
        Ok(SynthesizedSpeech {
            audio_url: format!("data:audio/mpeg;base64,{}", BASE64.encode(&audio)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_without_api_key() {
        let config: ProviderEndpointConfig = serde_json::from_value(serde_json::json!({
            "base_url": "https://aether.test/v1",
            "model": "aether-voice",
        }))
        .unwrap();
        let adapter = AetherAdapter::new(config).unwrap();
        assert!(!adapter.is_configured());
        assert_eq!(adapter.synthesize_url(), "https://aether.test/v1/synthesize");
    }
}
