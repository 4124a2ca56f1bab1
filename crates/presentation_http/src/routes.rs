//! Route definitions

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use infrastructure::config::{Environment, ServerConfig};
use tower_http::cors::{Any, CorsLayer};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health::health_check))
        // Interview API (v1): action-dispatched
        .route("/v1/interview", post(handlers::interview::interview))
        // Credit administration (v1): action-dispatched
        .route("/v1/credits", post(handlers::credits::credits))
        // Attach state
        .with_state(state)
}

/// CORS policy for the deployment.
///
/// Development with no configured origins is permissive; production, or any
/// deployment with configured origins, restricts to the configured list (an
/// empty list in production allows no cross-origin caller).
pub fn cors_layer(environment: Environment, server: &ServerConfig) -> CorsLayer {
    if environment.is_production() || !server.allowed_origins.is_empty() {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
