//! Question generation port

use async_trait::async_trait;

use crate::context::InterviewContext;

use super::{ProviderAdapter, ProviderError};

/// A generated interview question
#[derive(Debug, Clone)]
pub struct GeneratedQuestion {
    /// The question text
    pub text: String,
    /// Tokens consumed, when the provider reports usage
    pub tokens_used: Option<u64>,
}

/// Port for question generation providers
#[async_trait]
pub trait QuestionGeneratorPort: ProviderAdapter {
    /// Generate the next interview question for the given context
    async fn generate(
        &self,
        context: &InterviewContext,
    ) -> Result<GeneratedQuestion, ProviderError>;
}
