//! Orion question generation adapter
//!
//! Speaks a chat-completions dialect: `POST {base}/chat/completions` with a
//! bearer key, messages array in, `choices[0].message.content` out.

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

/// Adapter for the Orion chat API
#[derive(Debug, Clone)]
pub struct OrionAdapter {
    client: Client,
    config: ProviderEndpointConfig,
}

impl OrionAdapter {
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
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageBody,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u64,
}

impl ProviderAdapter for OrionAdapter {
    fn codename(&self) -> Codename {
        Codename::Orion
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl QuestionGeneratorPort for OrionAdapter {
    #[instrument(skip(self, context))]
    async fn generate(
        &self,
        context: &InterviewContext,
    ) -> Result<GeneratedQuestion, ProviderError> {
        let Some(key) = &self.config.api_key else {
            return Err(ProviderError::MissingCredentials);
        };

        let prompt = question_prompt(context);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: 0.7,
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

        let text = body
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("empty choices".to_string()))?;

        debug!(text_len = text.len(), "Orion generated a question");
        Ok(GeneratedQuestion {
            text,
            tokens_used: body.usage.map(|u| u.total_tokens),
        })
    }
}
