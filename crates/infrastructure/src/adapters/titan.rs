//! Titan question generation adapter
//!
//! Speaks a generateContent dialect: the key travels as a query parameter,
//! the prompt as `contents[].parts[].text`, and the reply comes back under
//! `candidates[0].content.parts[0].text`.

use application::ApplicationError;
use application::context::InterviewContext;
use application::ports::{GeneratedQuestion, ProviderAdapter, ProviderError, QuestionGeneratorPort};
use async_trait::async_trait;
use domain::Codename;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ProviderEndpointConfig;

use super::{api_error, build_client, question_prompt, transport};

/// Adapter for the Titan generateContent API
#[derive(Debug, Clone)]
pub struct TitanAdapter {
    client: Client,
    config: ProviderEndpointConfig,
}

impl TitanAdapter {
    /// Create the adapter from its endpoint configuration
    pub fn new(config: ProviderEndpointConfig) -> Result<Self, ApplicationError> {
        let client = build_client(config.timeout_ms)?;
        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata", default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "totalTokenCount")]
    total_token_count: u64,
}

impl ProviderAdapter for TitanAdapter {
    fn codename(&self) -> Codename {
        Codename::Titan
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl QuestionGeneratorPort for TitanAdapter {
    #[instrument(skip(self, context))]
    async fn generate(
        &self,
        context: &InterviewContext,
    ) -> Result<GeneratedQuestion, ProviderError> {
        let Some(key) = &self.config.api_key else {
            return Err(ProviderError::MissingCredentials);
        };

        let prompt = question_prompt(context);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", key.expose_secret())])
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

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("empty candidates".to_string()))?;

        debug!(text_len = text.len(), "Titan generated a question");
        Ok(GeneratedQuestion {
            text,
            tokens_used: body.usage_metadata.map(|u| u.total_token_count),
        })
    }
}
