//! Chat message shapes shown in the sidebar.

use chrono::{DateTime, Local};
use pprovider::Message;

/// First message of every new session.
pub const GREETING: &str = "Hi! 👋 I'm the PumaPromos assistant.\n\nI can help you with:\n• Product recommendations\n• Pricing questions\n• Customization options\n• Order inquiries\n\nWhat can I help you with?";

/// Replaces a reply whose provider failed.
pub const CHAT_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Replaces a reply when the session could not reach the assistant at all.
pub const CONNECTION_APOLOGY: &str = "Sorry, I am having trouble connecting. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Local::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, content)
    }

    pub fn greeting() -> Self {
        Self::model(GREETING)
    }

    /// Same message with different content; the timestamp is kept.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            role: self.role,
            content: content.into(),
            sent_at: self.sent_at,
        }
    }

    /// Two-digit hour and minute, e.g. `03:04 PM`.
    pub fn timestamp(&self) -> String {
        self.sent_at.format("%I:%M %p").to_string()
    }

    pub fn to_provider_message(&self) -> Message {
        match self.role {
            ChatRole::User => Message::user(self.content.clone()),
            ChatRole::Model => Message::assistant(self.content.clone()),
        }
    }
}
