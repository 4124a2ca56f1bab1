//! Interview handlers
//!
//! One action-dispatched endpoint. Routing failures with a defined client
//! behavior (canned question, browser-side TTS) are answered as 200 bodies;
//! transcription unavailability is the one routing failure that surfaces
//! as an error status.

use application::services::ModelStatusEntry;
use application::{InterviewContext, SpeechOutcome};
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use domain::ResponseEvaluation;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Interview request body
#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    /// Which operation to perform
    pub action: String,
    /// Per-action request data
    #[serde(default)]
    pub context: InterviewContext,
}

/// One row of the model status report, as serialized on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatusBody {
    pub codename: String,
    pub credit_status: bool,
    pub daily_usage: u64,
    pub monthly_usage: u64,
    pub daily_limit: u64,
    pub monthly_limit: u64,
}

impl From<ModelStatusEntry> for ModelStatusBody {
    fn from(entry: ModelStatusEntry) -> Self {
        Self {
            codename: entry.codename.to_string(),
            credit_status: entry.credit_status,
            daily_usage: entry.daily_usage,
            monthly_usage: entry.monthly_usage,
            daily_limit: entry.daily_limit,
            monthly_limit: entry.monthly_limit,
        }
    }
}

/// Response for `generate_question`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub question: String,
    pub used_model: String,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<ResponseEvaluation>,
    pub model_status: Vec<ModelStatusBody>,
}

/// Response for `process_audio`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResponse {
    pub transcript: String,
    pub used_model: String,
}

/// Response for `evaluate_response`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub evaluation: ResponseEvaluation,
    pub used_model: String,
    pub fallback: bool,
}

/// Response for `get_model_status`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatusResponse {
    pub model_status: Vec<ModelStatusBody>,
}

/// Dispatch an interview action
#[instrument(skip(state, request), fields(action = %request.action))]
pub async fn interview(
    State(state): State<AppState>,
    Json(request): Json<InterviewRequest>,
) -> Result<Response, ApiError> {
    match request.action.as_str() {
        "generate_question" => generate_question(&state, &request.context).await,
        "process_audio" => process_audio(&state, &request.context).await,
        "generate_speech" => generate_speech(&state, &request.context).await,
        "evaluate_response" => evaluate_response(&state, &request.context).await,
        "get_model_status" => get_model_status(&state).await,
        other => Err(ApiError::UnknownAction(other.to_string())),
    }
}

async fn generate_question(
    state: &AppState,
    context: &InterviewContext,
) -> Result<Response, ApiError> {
    let outcome = state.orchestrator.generate_question(context).await?;
    let model_status = state
        .orchestrator
        .model_status()
        .await?
        .into_iter()
        .map(ModelStatusBody::from)
        .collect();

    Ok(Json(QuestionResponse {
        question: outcome.question,
        used_model: outcome.used_model,
        fallback: outcome.fallback,
        evaluation: outcome.evaluation,
        model_status,
    })
    .into_response())
}

async fn process_audio(
    state: &AppState,
    context: &InterviewContext,
) -> Result<Response, ApiError> {
    let outcome = state.orchestrator.transcribe_audio(context).await?;
    Ok(Json(TranscriptResponse {
        transcript: outcome.transcript,
        used_model: outcome.used_model,
    })
    .into_response())
}

async fn generate_speech(
    state: &AppState,
    context: &InterviewContext,
) -> Result<Response, ApiError> {
    match state.orchestrator.generate_speech(context).await? {
        SpeechOutcome::Synthesized {
            audio_url,
            used_model,
        } => Ok(Json(serde_json::json!({
            "audioUrl": audio_url,
            "usedModel": used_model,
        }))
        .into_response()),
        // Soft error: the client falls back to browser-side synthesis
        SpeechOutcome::BrowserFallback => Ok(Json(serde_json::json!({
            "error": "All TTS models failed",
            "useBrowserTTS": true,
        }))
        .into_response()),
    }
}

async fn evaluate_response(
    state: &AppState,
    context: &InterviewContext,
) -> Result<Response, ApiError> {
    let outcome = state.orchestrator.evaluate_response(context).await?;
    Ok(Json(EvaluationResponse {
        evaluation: outcome.evaluation,
        used_model: outcome.used_model,
        fallback: outcome.fallback,
    })
    .into_response())
}

async fn get_model_status(state: &AppState) -> Result<Response, ApiError> {
    let model_status = state
        .orchestrator
        .model_status()
        .await?
        .into_iter()
        .map(ModelStatusBody::from)
        .collect();
    Ok(Json(ModelStatusResponse { model_status }).into_response())
}
