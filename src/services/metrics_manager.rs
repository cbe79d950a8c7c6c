use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::OutcomeKind;

/// Dispatch outcomes keyed by [`OutcomeKind::as_str`].
#[derive(Debug, Default, Clone, Serialize)]
pub struct DispatchStats {
    pub outcomes: HashMap<String, u64>,
}

impl DispatchStats {
    pub fn count(&self, kind: OutcomeKind) -> u64 {
        self.outcomes.get(kind.as_str()).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct MetricsManager {
    inner: Arc<RwLock<DispatchStats>>,
}

impl Default for MetricsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(DispatchStats::default())),
        }
    }

    pub async fn record_outcome(&self, kind: OutcomeKind) {
        let mut data = self.inner.write().await;
        *data.outcomes.entry(kind.as_str().to_string()).or_insert(0) += 1;
    }

    pub async fn get_metrics(&self) -> DispatchStats {
        self.inner.read().await.clone()
    }
}
