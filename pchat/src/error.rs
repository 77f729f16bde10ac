//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    /// Another reply is still streaming for the same session.
    Busy,
    InvalidState,
    Provider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn busy(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Busy, message)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidState, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn is_busy(&self) -> bool {
        self.kind == ChatErrorKind::Busy
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<pprovider::ProviderError> for ChatError {
    fn from(value: pprovider::ProviderError) -> Self {
        ChatError::provider(value.to_string())
    }
}
