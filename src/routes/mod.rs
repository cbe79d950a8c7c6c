// src/routes/mod.rs
pub mod chat;
pub mod page;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::{chat_handler, close_handler, stats_handler, transcript_handler};
use page::page_handler;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(static_dir: &str) -> Router<SharedState> {
    Router::new()
        .route("/", get(page_handler))
        .route("/chat", post(chat_handler))
        .route("/session/{id}/transcript", get(transcript_handler))
        .route("/session/{id}/close", post(close_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
