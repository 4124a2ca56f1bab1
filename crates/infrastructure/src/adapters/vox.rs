//! Vox speech synthesis adapter
//!
//! JSON in, JSON out: `POST {base}/audio/speech` returns `{"audio_url"}`
//! pointing at hosted audio.

use application::ApplicationError;
use application::ports::{ProviderAdapter, ProviderError, SpeechSynthesisPort, SynthesizedSpeech};
use async_trait::async_trait;
use domain::Codename;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ProviderEndpointConfig;

use super::{api_error, build_client, transport};

/// Adapter for the Vox TTS API
#[derive(Debug, Clone)]
pub struct VoxAdapter {
    client: Client,
    config: ProviderEndpointConfig,
}

impl VoxAdapter {
    /// Create the adapter from its endpoint configuration
    pub fn new(config: ProviderEndpointConfig) -> Result<Self, ApplicationError> {
        let client = build_client(config.timeout_ms)?;
        Ok(Self { client, config })
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.config.base_url)
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    audio_url: String,
}

impl ProviderAdapter for VoxAdapter {
    fn codename(&self) -> Codename {
        Codename::Vox
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl SpeechSynthesisPort for VoxAdapter {
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
        let request = SpeechRequest {
            model: &self.config.model,
            input: text,
            voice,
        };

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: SpeechResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        if body.audio_url.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty audio_url".to_string(),
            ));
        }

        debug!("Vox synthesized speech");
        Ok(SynthesizedSpeech {
            audio_url: body.audio_url,
        })
    }
}
