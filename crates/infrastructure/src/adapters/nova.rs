//! Nova question generation adapter
//!
//! Self-hosted completion API: `POST {base}/api/generate` with no
//! authentication. Nova is always configured, which keeps question
//! generation alive when every keyed provider is missing credentials.

use application::ApplicationError;
use application::context::InterviewContext;
use application::ports::{GeneratedQuestion, ProviderAdapter, ProviderError, QuestionGeneratorPort};
use async_trait::async_trait;
use domain::Codename;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ProviderEndpointConfig;

use super::{api_error, build_client, question_prompt, transport};

/// Adapter for the self-hosted Nova API
#[derive(Debug, Clone)]
pub struct NovaAdapter {
    client: Client,
    config: ProviderEndpointConfig,
}

impl NovaAdapter {
    /// Create the adapter from its endpoint configuration
    pub fn new(config: ProviderEndpointConfig) -> Result<Self, ApplicationError> {
        let client = build_client(config.timeout_ms)?;
        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

impl ProviderAdapter for NovaAdapter {
    fn codename(&self) -> Codename {
        Codename::Nova
    }

    // No credential needed for a self-hosted endpoint
    fn is_configured(&self) -> bool {
        true
    }
}

#[async_trait]
impl QuestionGeneratorPort for NovaAdapter {
    #[instrument(skip(self, context))]
    async fn generate(
        &self,
        context: &InterviewContext,
    ) -> Result<GeneratedQuestion, ProviderError> {
        let prompt = question_prompt(context);
        let request = GenerateRequest {
            model: &self.config.model,
            prompt: &prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let text = body.response.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty response".to_string(),
            ));
        }

        let tokens_used = match (body.prompt_eval_count, body.eval_count) {
            (None, None) => None,
            (prompt_tokens, eval_tokens) => {
                Some(prompt_tokens.unwrap_or(0) + eval_tokens.unwrap_or(0))
            }
        };

        debug!(text_len = text.len(), "Nova generated a question");
        Ok(GeneratedQuestion { text, tokens_used })
    }
}
