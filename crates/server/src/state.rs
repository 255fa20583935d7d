//! Shared application state

use std::sync::Arc;

use frontdesk_agent::CallOrchestrator;
use frontdesk_config::Settings;

/// State shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub orchestrator: Arc<CallOrchestrator>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, orchestrator: Arc<CallOrchestrator>) -> Self {
        Self {
            settings,
            orchestrator,
        }
    }
}
