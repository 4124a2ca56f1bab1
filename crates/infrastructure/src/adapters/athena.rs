//! Athena response evaluation adapter
//!
//! Same chat-completions dialect as Orion, but the reply is expected to be a
//! strict JSON verdict. A fenced or otherwise decorated reply is tolerated;
//! anything that does not parse is a malformed response.

use application::ApplicationError;
use application::context::InterviewContext;
use application::ports::{EvaluationPort, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use domain::{Codename, EvaluationScores, ResponseEvaluation};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ProviderEndpointConfig;

use super::{api_error, build_client, evaluation_prompt, strip_code_fence, transport};

/// Adapter for the Athena evaluation API
#[derive(Debug, Clone)]
pub struct AthenaAdapter {
    client: Client,
    config: ProviderEndpointConfig,
}

impl AthenaAdapter {
    /// Create the adapter from its endpoint configuration
    pub fn new(config: ProviderEndpointConfig) -> Result<Self, ApplicationError> {
        let client = build_client(config.timeout_ms)?;
        Ok(Self { client, config })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageBody,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    content: String,
}

/// The JSON verdict shape Athena is prompted to return
#[derive(Debug, Deserialize)]
struct Verdict {
    clarity: u8,
    confidence: u8,
    content: u8,
    tone: u8,
    feedback: String,
}

impl ProviderAdapter for AthenaAdapter {
    fn codename(&self) -> Codename {
        Codename::Athena
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl EvaluationPort for AthenaAdapter {
    #[instrument(skip(self, context))]
    async fn evaluate(
        &self,
        context: &InterviewContext,
    ) -> Result<ResponseEvaluation, ProviderError> {
        let Some(key) = &self.config.api_key else {
            return Err(ProviderError::MissingCredentials);
        };

        let prompt = evaluation_prompt(context);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ProviderError::MalformedResponse("empty choices".to_string()))?;

        let verdict: Verdict = serde_json::from_str(strip_code_fence(content))
            .map_err(|e| ProviderError::MalformedResponse(format!("verdict not JSON: {e}")))?;

        debug!("Athena evaluated a response");
        Ok(ResponseEvaluation {
            scores: EvaluationScores {
                clarity: verdict.clarity,
                confidence: verdict.confidence,
                content: verdict.content,
                tone: verdict.tone,
            },
            feedback: verdict.feedback,
        })
    }
}
