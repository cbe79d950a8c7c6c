// src/error.rs
use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Shown in the transcript whenever a dispatch fails, whatever the cause.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again!";

/// Why a webhook round trip produced no reply. Logged, never shown.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("webhook transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("webhook body is not JSON")]
    UnparsableBody,

    #[error("webhook reply has no recognizable text")]
    UnrecognizedShape,
}

impl DispatchError {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Transport(_) => OutcomeKind::Transport,
            Self::Status(_) => OutcomeKind::Status,
            Self::UnparsableBody => OutcomeKind::Unparsable,
            Self::UnrecognizedShape => OutcomeKind::Unrecognized,
        }
    }
}

/// How a dispatch settled, used for logging and the outcome counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Delivered,
    Transport,
    Status,
    Unparsable,
    Unrecognized,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Transport => "transport",
            Self::Status => "status",
            Self::Unparsable => "unparsable",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a send was refused before anything was shown or posted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendRejected {
    #[error("Message cannot be empty")]
    Blank,

    #[error("No quick prompt at index {0}")]
    UnknownPrompt(usize),

    #[error("Chat session is closed")]
    Detached,

    #[error("session {0}")]
    UnknownTab(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SendRejected> for AppError {
    fn from(e: SendRejected) -> Self {
        match e {
            SendRejected::UnknownTab(_) => AppError::NotFound(e.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}
