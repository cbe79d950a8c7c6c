use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use tracing::info;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::{metrics_manager::DispatchStats, widget::SendInput},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session_id = match &payload.session_id {
        Some(s) if !s.trim().is_empty() => state.sessions.ensure_session(s.trim()).await,
        _ => state.sessions.create_session().await,
    };

    let input = match payload.prompt {
        Some(index) => SendInput::Prompt(index),
        None => SendInput::Typed(&payload.message),
    };
    let report = state
        .sessions
        .dispatch(&session_id, &state.webhook, input)
        .await?;

    state.metrics.record_outcome(report.outcome.kind).await;

    Ok(Json(ChatResponse {
        session_id,
        reply: report.outcome.reply,
        transcript_html: report.transcript_html,
        input_enabled: report.input_enabled,
    }))
}

pub async fn transcript_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Html<String>, AppError> {
    state
        .sessions
        .with_widget(&session_id, |w| w.transcript().render_html())
        .await
        .map(Html)
        .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))
}

/// Page unload beacon.
pub async fn close_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove_session(&session_id).await {
        info!(tab = %session_id, "tab session closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("session {session_id}")))
    }
}

pub async fn stats_handler(State(state): State<SharedState>) -> Json<DispatchStats> {
    Json(state.metrics.get_metrics().await)
}
