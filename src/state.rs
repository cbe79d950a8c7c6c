// src/state.rs
use std::sync::Arc;

use crate::config::WidgetConfig;
use crate::services::metrics_manager::MetricsManager;
use crate::services::session_manager::SessionManager;
use crate::services::webhook::WebhookClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Arc<WidgetConfig>,
    pub sessions: SessionManager,
    pub webhook: WebhookClient,
    pub metrics: MetricsManager,
}

impl AppState {
    pub fn new(config: WidgetConfig) -> Self {
        let config = Arc::new(config);
        Self {
            sessions: SessionManager::new(Arc::clone(&config)),
            webhook: WebhookClient::new(config.webhook_url.clone()),
            metrics: MetricsManager::new(),
            config,
        }
    }
}
