//! Echo transcription adapter
//!
//! Multipart upload: the decoded audio is sent as a file part alongside the
//! model name; the reply is `{"text"}`.

use application::ApplicationError;
use application::ports::{ProviderAdapter, ProviderError, Transcript, TranscriptionPort};
use async_trait::async_trait;
use domain::Codename;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::ProviderEndpointConfig;

use super::{api_error, build_client, transport};

/// Adapter for the Echo STT API
#[derive(Debug, Clone)]
pub struct EchoAdapter {
    client: Client,
    config: ProviderEndpointConfig,
}

impl EchoAdapter {
    /// Create the adapter from its endpoint configuration
    pub fn new(config: ProviderEndpointConfig) -> Result<Self, ApplicationError> {
        let client = build_client(config.timeout_ms)?;
        Ok(Self { client, config })
    }

    fn transcription_url(&self) -> String {
        format!("{}/audio/transcriptions", self.config.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl ProviderAdapter for EchoAdapter {
    fn codename(&self) -> Codename {
        Codename::Echo
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl TranscriptionPort for EchoAdapter {
    #[instrument(skip(self, audio), fields(payload_len = audio.len()))]
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, ProviderError> {
        let Some(key) = &self.config.api_key else {
            return Err(ProviderError::MissingCredentials);
        };

        let file_part = Part::bytes(audio.to_vec())
            .file_name("audio.webm")
            .mime_str("audio/webm")
            .map_err(|e| ProviderError::MalformedResponse(format!("invalid MIME type: {e}")))?;
        let form = Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone());

        let response = self
            .client
            .post(self.transcription_url())
            .bearer_auth(key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        debug!(text_len = body.text.len(), "Echo transcribed audio");
        Ok(Transcript { text: body.text })
    }
}
