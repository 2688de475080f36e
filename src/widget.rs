//! Chat widget state machine.
//!
//! The widget is either closed or open; while open it is idle or waiting on
//! a reply. A send appends the user message right away, then the reply (or
//! a generic apology when the transport fails) once it arrives. There is no
//! retry.
//!
//! ```text
//!   Closed ──toggle──▶ Open(Idle) ──send──▶ Open(Sending)
//!     ▲                   │  ▲                  │
//!     └──────toggle───────┘  └─────reply/error──┘
//! ```
//!
//! The same states drive the browser widget served at `/` and the terminal
//! `chat` command. [`ChatTransport`] is the seam between the state machine
//! and wherever replies come from.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::assistant::Assistant;
use crate::models::{ChatResponse, UiDirective};

pub const WELCOME_TEXT: &str = "Hi! I'm your Little Llama assistant. How can I help you today?";
pub const TRANSPORT_ERROR_TEXT: &str = "Sorry, something went wrong. Please try again.";

pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "How long does shipping take?",
    "What is your return policy?",
    "How do I wash my items?",
    "I want to speak to a human",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiDirective>,
}

impl ChatMessage {
    fn user(text: String) -> Self {
        Self {
            role: Role::User,
            text,
            timestamp: Local::now(),
            ui: None,
        }
    }

    fn assistant(text: String, ui: Option<UiDirective>) -> Self {
        Self {
            role: Role::Assistant,
            text,
            timestamp: Local::now(),
            ui,
        }
    }

    /// `HH:MM`, as shown under each bubble.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    pub fn shows_escalation_form(&self) -> bool {
        self.ui
            .as_ref()
            .is_some_and(|ui| ui.kind == UiDirective::ESCALATION_FORM)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Closed,
    Open(Phase),
}

/// Where replies come from.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<ChatResponse>;
}

/// Answers in-process, without a server.
pub struct LocalTransport {
    assistant: Arc<Assistant>,
}

impl LocalTransport {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl ChatTransport for LocalTransport {
    async fn send(&self, message: &str) -> Result<ChatResponse> {
        Ok(self.assistant.reply(message))
    }
}

/// Conversation held in memory for the lifetime of the widget.
#[derive(Debug)]
pub struct ChatWidget {
    panel: Panel,
    messages: Vec<ChatMessage>,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        Self {
            panel: Panel::Closed,
            messages: Vec::new(),
        }
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn is_open(&self) -> bool {
        matches!(self.panel, Panel::Open(_))
    }

    pub fn is_sending(&self) -> bool {
        self.panel == Panel::Open(Phase::Sending)
    }

    /// Opens or closes the panel. The conversation survives closing, and an
    /// in-flight send keeps its phase across a close/open cycle.
    pub fn toggle(&mut self) {
        self.panel = match self.panel {
            Panel::Closed if self.pending_reply() => Panel::Open(Phase::Sending),
            Panel::Closed => Panel::Open(Phase::Idle),
            Panel::Open(_) => Panel::Closed,
        };
    }

    fn pending_reply(&self) -> bool {
        self.messages.last().is_some_and(|m| m.role == Role::User)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Suggested questions, offered only before the first message.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.messages.is_empty() {
            SUGGESTED_QUESTIONS
        } else {
            &[]
        }
    }

    /// Starts a send. Returns the trimmed text to post, or `None` when the
    /// text is blank, the panel is closed, or a reply is still pending.
    pub fn begin_send(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || self.panel != Panel::Open(Phase::Idle) {
            return None;
        }
        self.messages.push(ChatMessage::user(text.to_string()));
        self.panel = Panel::Open(Phase::Sending);
        Some(text.to_string())
    }

    /// Completes the in-flight send with the transport's outcome. Ignored
    /// when no send is in flight.
    pub fn finish_send(&mut self, outcome: Result<ChatResponse>) {
        if !self.pending_reply() {
            tracing::debug!("reply with no send in flight; ignored");
            return;
        }
        let message = match outcome {
            Ok(resp) => ChatMessage::assistant(resp.reply, resp.ui),
            Err(e) => {
                tracing::warn!(error = %e, "chat transport failed");
                ChatMessage::assistant(TRANSPORT_ERROR_TEXT.to_string(), None)
            }
        };
        self.messages.push(message);
        self.panel = match self.panel {
            Panel::Open(_) => Panel::Open(Phase::Idle),
            Panel::Closed => Panel::Closed,
        };
    }

    /// Runs one full turn against `transport`. Returns the assistant message
    /// appended, or `None` if the send was rejected.
    pub async fn send(
        &mut self,
        transport: &dyn ChatTransport,
        text: &str,
    ) -> Option<&ChatMessage> {
        let outgoing = self.begin_send(text)?;
        let outcome = transport.send(&outgoing).await;
        self.finish_send(outcome);
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Echo;

    #[async_trait]
    impl ChatTransport for Echo {
        async fn send(&self, message: &str) -> Result<ChatResponse> {
            Ok(ChatResponse::text(format!("echo: {}", message)))
        }
    }

    struct Broken;

    #[async_trait]
    impl ChatTransport for Broken {
        async fn send(&self, _message: &str) -> Result<ChatResponse> {
            bail!("connection refused")
        }
    }

    fn open_widget() -> ChatWidget {
        let mut w = ChatWidget::new();
        w.toggle();
        w
    }

    #[test]
    fn test_starts_closed_and_toggles() {
        let mut w = ChatWidget::new();
        assert_eq!(w.panel(), Panel::Closed);
        assert!(!w.is_open());
        w.toggle();
        assert_eq!(w.panel(), Panel::Open(Phase::Idle));
        assert!(w.is_open());
        w.toggle();
        assert_eq!(w.panel(), Panel::Closed);
        assert!(!w.is_open());
    }

    #[test]
    fn test_reply_without_send_is_ignored() {
        let mut closed = ChatWidget::new();
        closed.finish_send(Ok(ChatResponse::text("stray")));
        assert!(closed.messages().is_empty());
        assert_eq!(closed.panel(), Panel::Closed);

        let mut w = open_widget();
        w.begin_send("hi");
        w.finish_send(Ok(ChatResponse::text("first")));
        w.finish_send(Ok(ChatResponse::text("second")));
        assert_eq!(w.messages().len(), 2);
        assert_eq!(w.messages()[1].text, "first");
        assert_eq!(w.panel(), Panel::Open(Phase::Idle));
    }

    #[test]
    fn test_send_is_optimistic() {
        let mut w = open_widget();
        let out = w.begin_send("  hello  ");
        assert_eq!(out.as_deref(), Some("hello"));
        assert!(w.is_sending());
        assert_eq!(w.messages().len(), 1);
        assert_eq!(w.messages()[0].role, Role::User);
        assert_eq!(w.messages()[0].text, "hello");
    }

    #[test]
    fn test_rejects_blank_closed_and_concurrent_sends() {
        let mut closed = ChatWidget::new();
        assert!(closed.begin_send("hi").is_none());

        let mut w = open_widget();
        assert!(w.begin_send("   ").is_none());
        assert!(w.begin_send("first").is_some());
        assert!(w.begin_send("second").is_none());
        assert_eq!(w.messages().len(), 1);
    }

    #[test]
    fn test_suggestions_only_while_empty() {
        let mut w = open_widget();
        assert_eq!(w.suggestions().len(), 4);
        w.begin_send(SUGGESTED_QUESTIONS[0]);
        assert!(w.suggestions().is_empty());
    }

    #[tokio::test]
    async fn test_full_turn_returns_to_idle() {
        let mut w = open_widget();
        let reply = w.send(&Echo, "hi").await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text, "echo: hi");
        assert_eq!(w.panel(), Panel::Open(Phase::Idle));
        assert_eq!(w.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_shows_apology() {
        let mut w = open_widget();
        let reply = w.send(&Broken, "hi").await.unwrap();
        assert_eq!(reply.text, TRANSPORT_ERROR_TEXT);
        assert!(reply.ui.is_none());
        assert!(!w.is_sending());
    }

    #[test]
    fn test_escalation_directive_is_kept() {
        let mut w = open_widget();
        w.begin_send("human please");
        w.finish_send(Ok(ChatResponse {
            reply: "fill in the form".to_string(),
            ui: Some(UiDirective::escalation_form()),
            products: Vec::new(),
        }));
        assert!(w.messages()[1].shows_escalation_form());
    }

    #[test]
    fn test_close_while_sending_resumes_sending_on_reopen() {
        let mut w = open_widget();
        w.begin_send("hi");
        w.toggle();
        assert_eq!(w.panel(), Panel::Closed);
        w.toggle();
        assert_eq!(w.panel(), Panel::Open(Phase::Sending));
        w.finish_send(Ok(ChatResponse::text("ok")));
        assert_eq!(w.panel(), Panel::Open(Phase::Idle));
    }
}
