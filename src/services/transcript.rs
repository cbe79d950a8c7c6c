// src/services/transcript.rs
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Bot,
}

impl MessageRole {
    fn css_class(self) -> &'static str {
        match self {
            MessageRole::User => "message user-message",
            MessageRole::Bot => "message bot-message",
        }
    }
}

/// Handle for a typing placeholder, e.g. `typing-3`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypingId(String);

impl TypingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Message { role: MessageRole, html: String },
    Typing,
}

#[derive(Clone, Debug)]
pub struct TranscriptNode {
    pub id: String,
    pub kind: NodeKind,
}

/// The visible conversation of one tab, oldest node first.
#[derive(Clone, Debug)]
pub struct Transcript {
    nodes: Vec<TranscriptNode>,
    next_id: u64,
    scroll_anchor: Option<String>,
    bot_name: String,
    avatar_url: String,
}

impl Transcript {
    pub fn new(bot_name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 0,
            scroll_anchor: None,
            bot_name: bot_name.into(),
            avatar_url: avatar_url.into(),
        }
    }

    /// Append a message and scroll to it. User text is escaped; bot text is
    /// trusted and only has its line breaks converted.
    pub fn append(&mut self, role: MessageRole, text: &str) -> &TranscriptNode {
        let html = match role {
            MessageRole::User => escape_user_text(text),
            MessageRole::Bot => format_response(text),
        };
        let id = self.next_node_id("msg");
        self.push(TranscriptNode {
            id,
            kind: NodeKind::Message { role, html },
        })
    }

    pub fn show_typing(&mut self) -> TypingId {
        let id = self.next_node_id("typing");
        self.push(TranscriptNode {
            id: id.clone(),
            kind: NodeKind::Typing,
        });
        TypingId(id)
    }

    /// Remove a typing placeholder. Unknown ids are ignored.
    pub fn remove_typing(&mut self, id: &TypingId) -> bool {
        let before = self.nodes.len();
        self.nodes
            .retain(|n| !(n.kind == NodeKind::Typing && n.id == id.0));
        let removed = self.nodes.len() != before;
        if removed && self.scroll_anchor.as_deref() == Some(id.as_str()) {
            self.scroll_anchor = self.nodes.last().map(|n| n.id.clone());
        }
        removed
    }

    /// Id of the node the view is scrolled to.
    pub fn scroll_anchor(&self) -> Option<&str> {
        self.scroll_anchor.as_deref()
    }

    pub fn nodes(&self) -> &[TranscriptNode] {
        &self.nodes
    }

    /// Message nodes only, as `(role, html)`.
    pub fn messages(&self) -> impl Iterator<Item = (MessageRole, &str)> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Message { role, html } => Some((*role, html.as_str())),
            NodeKind::Typing => None,
        })
    }

    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    pub fn is_typing(&self) -> bool {
        self.nodes.iter().any(|n| n.kind == NodeKind::Typing)
    }

    pub fn render_html(&self) -> String {
        self.nodes.iter().map(|n| self.render_node(n)).collect()
    }

    fn render_node(&self, node: &TranscriptNode) -> String {
        match &node.kind {
            NodeKind::Message {
                role: MessageRole::User,
                html,
            } => format!(
                r#"<div class="{}" id="{}"><div class="message-content"><p>{html}</p></div></div>"#,
                MessageRole::User.css_class(),
                node.id,
            ),
            NodeKind::Message {
                role: MessageRole::Bot,
                html,
            } => format!(
                r#"<div class="{}" id="{}">{}<div class="message-content"><p>{html}</p></div></div>"#,
                MessageRole::Bot.css_class(),
                node.id,
                self.avatar(),
            ),
            NodeKind::Typing => format!(
                r#"<div class="{}" id="{}">{}<div class="message-content"><div class="typing-indicator"><span class="typing-dot"></span><span class="typing-dot"></span><span class="typing-dot"></span></div></div></div>"#,
                MessageRole::Bot.css_class(),
                node.id,
                self.avatar(),
            ),
        }
    }

    fn avatar(&self) -> String {
        format!(
            r#"<div class="message-avatar"><img src="{}" alt="{}"></div>"#,
            escape_attr(&self.avatar_url),
            escape_attr(&self.bot_name),
        )
    }

    fn next_node_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn push(&mut self, node: TranscriptNode) -> &TranscriptNode {
        self.scroll_anchor = Some(node.id.clone());
        self.nodes.push(node);
        &self.nodes[self.nodes.len() - 1]
    }
}

/// Neutralize markup in visitor-typed text.
pub fn escape_user_text(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Turn literal `\n` sequences and real newlines into `<br>`, then trim.
pub fn format_response(text: &str) -> String {
    text.replace("\\n", "<br>")
        .replace('\n', "<br>")
        .trim()
        .to_owned()
}

pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
