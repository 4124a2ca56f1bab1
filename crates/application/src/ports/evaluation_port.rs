//! Response evaluation port

use async_trait::async_trait;
use domain::ResponseEvaluation;

use crate::context::InterviewContext;

use super::{ProviderAdapter, ProviderError};

/// Port for response evaluation providers
#[async_trait]
pub trait EvaluationPort: ProviderAdapter {
    /// Score the candidate response carried in the context
    async fn evaluate(
        &self,
        context: &InterviewContext,
    ) -> Result<ResponseEvaluation, ProviderError>;
}
