//! Application state shared across handlers

use std::sync::Arc;

use application::{CreditMonitor, InterviewOrchestrator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator routing capability requests across providers
    pub orchestrator: Arc<InterviewOrchestrator>,
    /// Credit monitor behind the `/v1/credits` actions
    pub monitor: Arc<CreditMonitor>,
}
