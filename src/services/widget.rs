//! Per-tab chat widget: transcript, input controls and the send state machine.
//!
//! A send moves through `handle_send`/`handle_prompt` (user node appended,
//! input disabled, typing node shown), the webhook call, and `finish_send`
//! (typing node removed, bot node appended, input re-enabled). The two halves
//! are separate so callers sharing the widget behind a lock can release it
//! while the request is in flight; see `SessionManager::dispatch`.

use tracing::{info, warn};

use crate::config::WidgetConfig;
use crate::error::{DispatchError, FALLBACK_REPLY, OutcomeKind, SendRejected};
use crate::message::{OutboundPayload, RequestFormat};
use crate::services::session_id::{self, MemoryTabStorage, TabStorage};
use crate::services::transcript::{MessageRole, Transcript, TypingId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    Attached,
    TornDown,
}

/// State of the text box and send button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputControls {
    pub enabled: bool,
    /// Set when input is re-enabled so the page can refocus the text box.
    pub focus_requested: bool,
}

impl Default for InputControls {
    fn default() -> Self {
        Self {
            enabled: true,
            focus_requested: false,
        }
    }
}

/// A quick-prompt button carrying the literal text it sends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptButton {
    pub prompt: String,
}

/// A send that has been shown in the transcript but not yet answered.
#[derive(Debug)]
pub struct PendingSend {
    pub payload: OutboundPayload,
    typing: TypingId,
}

/// What the visitor triggered.
#[derive(Clone, Copy, Debug)]
pub enum SendInput<'a> {
    /// Raw text box value, from the send button or Enter.
    Typed(&'a str),
    /// A quick-prompt button, by position.
    Prompt(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Text appended as the bot message.
    pub reply: String,
    pub kind: OutcomeKind,
}

impl DispatchOutcome {
    pub fn delivered(&self) -> bool {
        self.kind == OutcomeKind::Delivered
    }
}

/// A settled send together with the widget state the page needs.
#[derive(Debug, Clone)]
pub struct SendReport {
    pub outcome: DispatchOutcome,
    pub transcript_html: String,
    pub input_enabled: bool,
}

#[derive(Debug)]
pub struct WidgetController<S: TabStorage = MemoryTabStorage> {
    storage: S,
    transcript: Transcript,
    input: InputControls,
    prompts: Vec<PromptButton>,
    request_format: RequestFormat,
    phase: Phase,
}

impl WidgetController<MemoryTabStorage> {
    pub fn new(config: &WidgetConfig) -> Self {
        Self::with_storage(config, MemoryTabStorage::new())
    }
}

impl<S: TabStorage> WidgetController<S> {
    pub fn with_storage(config: &WidgetConfig, storage: S) -> Self {
        Self {
            storage,
            transcript: Transcript::new(&config.bot_name, &config.avatar_url),
            input: InputControls::default(),
            prompts: config
                .quick_prompts
                .iter()
                .map(|p| PromptButton { prompt: p.clone() })
                .collect(),
            request_format: config.request_format,
            phase: Phase::Constructed,
        }
    }

    /// Wire the widget to its tab. Creates the session identifier if needed.
    pub fn attach(&mut self) -> String {
        let sid = session_id::ensure_session(&mut self.storage);
        if self.phase == Phase::Constructed {
            info!(user_session = %sid, "chat widget attached");
            self.phase = Phase::Attached;
        }
        sid
    }

    /// Detach on page unload. Later sends are ignored.
    pub fn teardown(&mut self) {
        self.phase = Phase::TornDown;
        self.input.enabled = false;
        self.input.focus_requested = false;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session_id(&self) -> Option<String> {
        session_id::current_session(&self.storage)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> InputControls {
        self.input
    }

    pub fn prompts(&self) -> &[PromptButton] {
        &self.prompts
    }

    /// Send button or Enter: trims the text box value and refuses blanks.
    pub fn handle_send(&mut self, raw_input: &str) -> Result<PendingSend, SendRejected> {
        self.begin_send(raw_input.trim())
    }

    /// Quick-prompt button: sends the literal prompt text it carries.
    pub fn handle_prompt(&mut self, index: usize) -> Result<PendingSend, SendRejected> {
        let prompt = self
            .prompts
            .get(index)
            .map(|b| b.prompt.clone())
            .ok_or(SendRejected::UnknownPrompt(index))?;
        self.begin_send(&prompt)
    }

    pub fn begin(&mut self, input: SendInput<'_>) -> Result<PendingSend, SendRejected> {
        match input {
            SendInput::Typed(raw) => self.handle_send(raw),
            SendInput::Prompt(index) => self.handle_prompt(index),
        }
    }

    /// Show `text` as a user message and prepare its webhook payload.
    ///
    /// Touches nothing when rejected. A disabled input does not block the
    /// send.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend, SendRejected> {
        if self.phase != Phase::Attached {
            return Err(SendRejected::Detached);
        }
        if text.trim().is_empty() {
            return Err(SendRejected::Blank);
        }

        self.transcript.append(MessageRole::User, text);
        self.input = InputControls {
            enabled: false,
            focus_requested: false,
        };
        let typing = self.transcript.show_typing();
        let payload = OutboundPayload::new(self.request_format, text, self.session_id());
        Ok(PendingSend { payload, typing })
    }

    /// Settle a send. Input is re-enabled on every path.
    pub fn finish_send(
        &mut self,
        pending: PendingSend,
        result: Result<String, DispatchError>,
    ) -> DispatchOutcome {
        self.transcript.remove_typing(&pending.typing);

        let outcome = match result {
            Ok(reply) => DispatchOutcome {
                reply,
                kind: OutcomeKind::Delivered,
            },
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "webhook dispatch failed");
                DispatchOutcome {
                    reply: FALLBACK_REPLY.to_owned(),
                    kind: e.kind(),
                }
            }
        };
        self.transcript.append(MessageRole::Bot, &outcome.reply);

        if self.phase != Phase::TornDown {
            self.input = InputControls {
                enabled: true,
                focus_requested: true,
            };
        }
        outcome
    }

    pub fn report(&self, outcome: DispatchOutcome) -> SendReport {
        SendReport {
            outcome,
            transcript_html: self.transcript.render_html(),
            input_enabled: self.input.enabled,
        }
    }
}
