// src/message.rs
use std::fmt;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat` sent by the widget page.
#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Index of a quick-prompt button; takes precedence over `message`.
    #[serde(default)]
    pub prompt: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub transcript_html: String,
    pub input_enabled: bool,
}

/// The two payload shapes accepted by webhooks in the wild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestFormat {
    /// `{"query", "userSession", "timestamp"}`
    #[default]
    Query,
    /// Legacy `{"message", "timestamp"}` with no session field.
    Message,
}

impl FromStr for RequestFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "message" | "legacy" => Ok(Self::Message),
            other => Err(format!("unknown request format '{other}', expected 'query' or 'message'")),
        }
    }
}

impl fmt::Display for RequestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Message => f.write_str("message"),
        }
    }
}

/// JSON body posted to the webhook.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum OutboundPayload {
    Query {
        query: String,
        #[serde(rename = "userSession")]
        user_session: Option<String>,
        timestamp: String,
    },
    Message {
        message: String,
        timestamp: String,
    },
}

impl OutboundPayload {
    /// Build a payload stamped with the current UTC time.
    pub fn new(format: RequestFormat, text: &str, user_session: Option<String>) -> Self {
        Self::with_timestamp(format, text, user_session, iso_timestamp())
    }

    pub fn with_timestamp(
        format: RequestFormat,
        text: &str,
        user_session: Option<String>,
        timestamp: String,
    ) -> Self {
        match format {
            RequestFormat::Query => Self::Query {
                query: text.to_owned(),
                user_session,
                timestamp,
            },
            RequestFormat::Message => Self::Message {
                message: text.to_owned(),
                timestamp,
            },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Query { query, .. } => query,
            Self::Message { message, .. } => message,
        }
    }
}

/// `2024-05-01T12:30:00.123Z`
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
