//! Provider HTTP adapters
//!
//! One adapter per provider, each speaking its own wire dialect. Adapters
//! report configuration through `ProviderAdapter::is_configured`; the
//! orchestrator never calls an unconfigured adapter.

pub mod aether;
pub mod athena;
pub mod echo;
pub mod nova;
pub mod orion;
pub mod titan;
pub mod vox;

use std::time::Duration;

use application::ApplicationError;
use application::context::InterviewContext;
use application::ports::ProviderError;
use reqwest::Client;

pub use aether::AetherAdapter;
pub use athena::AthenaAdapter;
pub use echo::EchoAdapter;
pub use nova::NovaAdapter;
pub use orion::OrionAdapter;
pub use titan::TitanAdapter;
pub use vox::VoxAdapter;

/// Build a reqwest client with the provider's timeout
pub(crate) fn build_client(timeout_ms: u64) -> Result<Client, ApplicationError> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(|e| ApplicationError::Configuration(format!("Failed to create HTTP client: {e}")))
}

/// Turn a non-2xx response into a provider error, keeping the body as message
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ProviderError::Api { status, message }
}

/// Map a transport-level reqwest failure
pub(crate) fn transport(e: &reqwest::Error) -> ProviderError {
    ProviderError::Http(e.to_string())
}

/// Build the question generation prompt shared by all generation adapters
pub(crate) fn question_prompt(context: &InterviewContext) -> String {
    let difficulty = context.difficulty.as_deref().unwrap_or("mid-level");
    let mut prompt = format!(
        "You are a professional job interviewer. Ask exactly one {difficulty} interview \
         question. This is question {} of the session.",
        context.question_number_or_first()
    );

    if !context.previous_questions.is_empty() {
        prompt.push_str("\nQuestions already asked, do not repeat them:\n");
        for question in &context.previous_questions {
            prompt.push_str("- ");
            prompt.push_str(question);
            prompt.push('\n');
        }
    }

    prompt.push_str("\nReply with the question text only, no preamble.");
    prompt
}

/// Build the evaluation prompt asking for a strict JSON verdict
pub(crate) fn evaluation_prompt(context: &InterviewContext) -> String {
    let question = context
        .current_question
        .as_deref()
        .unwrap_or("(question unavailable)");
    let response = context.user_response.as_deref().unwrap_or_default();

    format!(
        "You are scoring an interview answer. Question: {question}\n\
         Candidate answer: {response}\n\
         Score clarity, confidence, content and tone from 1 to 10 and give one \
         short paragraph of feedback. Reply with JSON only, in the shape \
         {{\"clarity\": n, \"confidence\": n, \"content\": n, \"tone\": n, \
         \"feedback\": \"...\"}}."
    )
}

/// Strip an optional markdown code fence from a model reply
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_prompt_lists_previous_questions() {
        let context = InterviewContext {
            difficulty: Some("senior".to_string()),
            question_number: Some(3),
            previous_questions: vec!["Tell me about yourself.".to_string()],
            ..InterviewContext::default()
        };
        let prompt = question_prompt(&context);
        assert!(prompt.contains("senior"));
        assert!(prompt.contains("question 3"));
        assert!(prompt.contains("Tell me about yourself."));
    }

    #[test]
    fn evaluation_prompt_embeds_question_and_answer() {
        let context = InterviewContext {
            current_question: Some("Why Rust?".to_string()),
            user_response: Some("Fearless concurrency.".to_string()),
            ..InterviewContext::default()
        };
        let prompt = evaluation_prompt(&context);
        assert!(prompt.contains("Why Rust?"));
        assert!(prompt.contains("Fearless concurrency."));
    }

    #[test]
    fn strips_json_code_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\nplain\n```"), "plain");
    }
}
