//! Credit administration handlers

use application::ExhaustedProvider;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Credits request body
#[derive(Debug, Deserialize)]
pub struct CreditsRequest {
    /// Which operation to perform
    pub action: String,
}

/// One exhausted provider, as serialized on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhaustedModelBody {
    pub codename: String,
    pub name: String,
    pub daily_usage: u64,
    pub monthly_usage: u64,
    pub daily_limit: u64,
    pub monthly_limit: u64,
    pub reason: String,
}

impl From<ExhaustedProvider> for ExhaustedModelBody {
    fn from(p: ExhaustedProvider) -> Self {
        Self {
            codename: p.codename.to_string(),
            name: p.name,
            daily_usage: p.daily_usage,
            monthly_usage: p.monthly_usage,
            daily_limit: p.daily_limit,
            monthly_limit: p.monthly_limit,
            reason: p.reason,
        }
    }
}

/// Response for `check_credits`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckCreditsResponse {
    pub success: bool,
    pub exhausted_models: Vec<ExhaustedModelBody>,
    pub updated_models: usize,
    pub timestamp: DateTime<Utc>,
}

/// Response for `reset_credits`
#[derive(Debug, Serialize)]
pub struct ResetCreditsResponse {
    pub success: bool,
    pub message: String,
}

/// Response for `get_exhausted_models`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhaustedModelsResponse {
    pub exhausted_models: Vec<ExhaustedModelBody>,
}

/// Dispatch a credit administration action
#[instrument(skip(state, request), fields(action = %request.action))]
pub async fn credits(
    State(state): State<AppState>,
    Json(request): Json<CreditsRequest>,
) -> Result<Response, ApiError> {
    match request.action.as_str() {
        "check_credits" => check_credits(&state).await,
        "reset_credits" => reset_credits(&state).await,
        "get_exhausted_models" => get_exhausted_models(&state).await,
        other => Err(ApiError::UnknownAction(other.to_string())),
    }
}

async fn check_credits(state: &AppState) -> Result<Response, ApiError> {
    let report = state.monitor.check_credits().await?;
    Ok(Json(CheckCreditsResponse {
        success: true,
        exhausted_models: report
            .newly_exhausted
            .into_iter()
            .map(ExhaustedModelBody::from)
            .collect(),
        updated_models: report.updated,
        timestamp: report.checked_at,
    })
    .into_response())
}

async fn reset_credits(state: &AppState) -> Result<Response, ApiError> {
    state.monitor.reset_credits().await?;
    Ok(Json(ResetCreditsResponse {
        success: true,
        message: "All provider credits have been reset".to_string(),
    })
    .into_response())
}

async fn get_exhausted_models(state: &AppState) -> Result<Response, ApiError> {
    let exhausted = state.monitor.exhausted_providers().await?;
    Ok(Json(ExhaustedModelsResponse {
        exhausted_models: exhausted.into_iter().map(ExhaustedModelBody::from).collect(),
    })
    .into_response())
}
