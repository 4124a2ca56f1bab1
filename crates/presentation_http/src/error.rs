//! API error handling
//!
//! Maps application errors onto the wire contract: routing failures that
//! still have a defined client behavior are answered inline by the handlers;
//! everything that reaches this type is a real failure.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::Codename;
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request named an action this endpoint does not dispatch
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The request body is missing a field the action requires
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No provider can currently serve the capability
    #[error("Service unavailable: {message}")]
    Unavailable {
        message: String,
        unavailable: Vec<Codename>,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Providers that could not serve the request
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_models: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, unavailable_models) = match self {
            Self::UnknownAction(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unknown action".to_string(),
                Vec::new(),
            ),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message, Vec::new()),
            Self::Unavailable {
                message,
                unavailable,
            } => (
                StatusCode::SERVICE_UNAVAILABLE,
                message,
                unavailable.iter().map(ToString::to_string).collect(),
            ),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message, Vec::new()),
        };

        let body = ErrorResponse {
            error,
            unavailable_models,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NoProvidersAvailable {
                ref unavailable, ..
            } => Self::Unavailable {
                message: err.to_string(),
                unavailable: unavailable.clone(),
            },
            ApplicationError::AllProvidersFailed { ref attempted, .. } => Self::Unavailable {
                message: err.to_string(),
                unavailable: attempted.clone(),
            },
            ApplicationError::Store(e) => Self::Unavailable {
                message: e.to_string(),
                unavailable: Vec::new(),
            },
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            }
        }
    }
}
