// src/config.rs
//! Widget configuration, loaded from environment variables at startup.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::message::RequestFormat;

const DEFAULT_QUICK_PROMPTS: &str = "What can you help me with?|What are your opening hours?|How do I get in touch?";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime configuration for the chat widget service.
///
/// Only `WEBHOOK_URL` is required; everything else has a default.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Remote automation endpoint every message is posted to.
    pub webhook_url: String,

    /// Which of the two accepted payload shapes to send.
    pub request_format: RequestFormat,

    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// Idle time after which a tab session is dropped.
    pub session_ttl: Duration,

    pub bot_name: String,
    pub avatar_url: String,

    /// Literal texts of the quick-prompt buttons.
    pub quick_prompts: Vec<String>,

    /// Directory served as the static fallback (avatar image, styles).
    pub static_dir: String,

    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl WidgetConfig {
    /// Config pointing at `webhook_url` with every other field defaulted.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            request_format: RequestFormat::default(),
            bind_address: "0.0.0.0:3000".to_owned(),
            session_ttl: Duration::from_secs(3600),
            bot_name: "Assistant".to_owned(),
            avatar_url: "logo.png".to_owned(),
            quick_prompts: split_prompts(DEFAULT_QUICK_PROMPTS),
            static_dir: "public".to_owned(),
            log_level: "info".to_owned(),
        }
    }

    pub fn with_request_format(mut self, format: RequestFormat) -> Self {
        self.request_format = format;
        self
    }

    /// Build from the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = std::env::var("WEBHOOK_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("WEBHOOK_URL"))?;

        let request_format = match std::env::var("WEBHOOK_REQUEST_FORMAT") {
            Ok(v) => v.parse::<RequestFormat>().map_err(|reason| ConfigError::Invalid {
                key: "WEBHOOK_REQUEST_FORMAT",
                reason,
            })?,
            Err(_) => RequestFormat::default(),
        };

        let defaults = Self::new(webhook_url);
        Ok(Self {
            request_format,
            bind_address: env_or("CHAT_BIND", &defaults.bind_address),
            session_ttl: Duration::from_secs(parse_env("CHAT_SESSION_TTL_SECS", 3600)?),
            bot_name: env_or("CHAT_BOT_NAME", &defaults.bot_name),
            avatar_url: env_or("CHAT_AVATAR_URL", &defaults.avatar_url),
            quick_prompts: std::env::var("CHAT_QUICK_PROMPTS")
                .map(|v| split_prompts(&v))
                .unwrap_or(defaults.quick_prompts.clone()),
            static_dir: env_or("CHAT_STATIC_DIR", &defaults.static_dir),
            log_level: env_or("CHAT_LOG", &defaults.log_level),
            ..defaults
        })
    }
}

fn split_prompts(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
