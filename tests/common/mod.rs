#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    routing::post,
};
use serde_json::Value;

#[derive(Clone)]
struct HookState {
    status: StatusCode,
    body: String,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

/// A throwaway webhook answering every POST with a canned status and body.
pub struct MockWebhook {
    pub url: String,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl MockWebhook {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.bodies.lock().unwrap().last().cloned()
    }
}

async fn hook(
    State(s): State<HookState>,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    s.hits.fetch_add(1, Ordering::SeqCst);
    s.bodies.lock().unwrap().push(body);
    (
        s.status,
        [(header::CONTENT_TYPE, "application/json")],
        s.body.clone(),
    )
}

pub async fn spawn_webhook(status: StatusCode, body: &str) -> MockWebhook {
    let hits = Arc::new(AtomicUsize::new(0));
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let state = HookState {
        status,
        body: body.to_string(),
        hits: Arc::clone(&hits),
        bodies: Arc::clone(&bodies),
    };
    let app = Router::new().route("/hook", post(hook)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockWebhook {
        url: format!("http://{addr}/hook"),
        hits,
        bodies,
    }
}

/// URL of a port nothing listens on.
pub async fn dead_webhook_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/hook")
}
