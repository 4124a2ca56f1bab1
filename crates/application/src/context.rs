//! Request context shared by all capability operations

use domain::SessionId;
use serde::{Deserialize, Serialize};

/// Context of one inbound capability request.
///
/// Deserialized from the `context` object of the endpoint body. Every field
/// is optional on the wire; which ones are required depends on the action
/// (audio for transcription, text for synthesis, and so on).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewContext {
    /// Session the request belongs to
    pub session_id: Option<SessionId>,
    /// Requested difficulty (free-form: "junior", "senior", ...)
    pub difficulty: Option<String>,
    /// 1-indexed number of the question being asked
    pub question_number: Option<u32>,
    /// Questions already asked in this session, to avoid repeats
    pub previous_questions: Vec<String>,
    /// The question the candidate is currently answering
    pub current_question: Option<String>,
    /// The candidate's answer, for evaluation
    pub user_response: Option<String>,
    /// Text to synthesize into speech
    pub text: Option<String>,
    /// Base64-encoded audio to transcribe
    pub audio: Option<String>,
    /// Preferred synthesis voice
    pub voice: Option<String>,
}

impl InterviewContext {
    /// Session id for usage attribution, anonymous when absent
    #[must_use]
    pub fn session(&self) -> SessionId {
        self.session_id.clone().unwrap_or_default()
    }

    /// Question number, defaulting to the first question
    #[must_use]
    pub fn question_number_or_first(&self) -> u32 {
        self.question_number.unwrap_or(1)
    }
}
