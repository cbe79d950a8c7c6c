// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::config::WidgetConfig;
use crate::error::SendRejected;
use crate::services::webhook::WebhookClient;
use crate::services::widget::{SendInput, SendReport, WidgetController};

/// One browser tab: its widget and when it was last used.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub widget: WidgetController,
    pub last_active: Instant,
}

impl Session {
    pub fn new(id: impl Into<String>, config: &WidgetConfig) -> Self {
        let mut widget = WidgetController::new(config);
        widget.attach();
        Self {
            id: id.into(),
            widget,
            last_active: Instant::now(),
        }
    }
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    config: Arc<WidgetConfig>,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(config: Arc<WidgetConfig>) -> Self {
        let ttl = config.session_ttl;
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            config,
            ttl,
        }
    }

    /// Open a fresh tab session and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), &self.config);
        info!(tab = %id, "tab session created");

        let mut guard = self.inner.write().await;
        guard.insert(id.clone(), session);
        id
    }

    /// Ensure there's a session with this id.
    pub async fn ensure_session(&self, id: &str) -> String {
        {
            let guard = self.inner.read().await;
            if guard.contains_key(id) {
                return id.to_string();
            }
        }
        let mut guard = self.inner.write().await;
        guard
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id.to_string(), &self.config));
        id.to_string()
    }

    /// Run `f` against a tab's widget and touch `last_active`.
    /// `None` when the tab is unknown.
    pub async fn with_widget<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut WidgetController) -> R,
    ) -> Option<R> {
        let mut guard = self.inner.write().await;
        let session = guard.get_mut(id)?;
        session.last_active = Instant::now();
        Some(f(&mut session.widget))
    }

    /// Run one send for a tab: show it, post it, settle it.
    ///
    /// The registry lock is held only on either side of the webhook call, so
    /// other tabs are never blocked on the network.
    pub async fn dispatch(
        &self,
        id: &str,
        client: &WebhookClient,
        input: SendInput<'_>,
    ) -> Result<SendReport, SendRejected> {
        let pending = self
            .with_widget(id, |w| w.begin(input))
            .await
            .ok_or_else(|| SendRejected::UnknownTab(id.to_owned()))??;

        let result = client.fetch_reply(&pending.payload).await;

        self.with_widget(id, move |w| {
            let outcome = w.finish_send(pending, result);
            w.report(outcome)
        })
        .await
        .ok_or_else(|| SendRejected::UnknownTab(id.to_owned()))
    }

    /// Tear down and forget a tab.
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        match guard.remove(session_id) {
            Some(mut session) => {
                session.widget.teardown();
                true
            }
            None => false,
        }
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let expired: Vec<String> = guard
            .iter()
            .filter(|(_, s)| now.duration_since(s.last_active) >= self.ttl)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            if let Some(mut session) = guard.remove(id) {
                session.widget.teardown();
            }
        }
        expired.len()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// List session ids
    pub async fn list_session_ids(&self) -> Vec<String> {
        let guard = self.inner.read().await;
        guard.keys().cloned().collect()
    }
}
