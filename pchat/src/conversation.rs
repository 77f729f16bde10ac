//! Conversation reducer driven by one outstanding reply at a time.
//!
//! Messages are shared as `Arc<ChatMessage>`. Applying a fragment swaps the
//! tail for a new allocation, so observers can detect change by pointer.
//!
//! ```rust
//! use pchat::{Conversation, TurnOutcome, TurnPhase};
//!
//! let mut conversation = Conversation::with_greeting();
//! conversation.begin_turn("Do you sell tumblers?").expect("transition should apply");
//! conversation.append_placeholder().expect("transition should apply");
//! conversation.apply_fragment("Yes, ").expect("transition should apply");
//! conversation.apply_fragment("we do.").expect("transition should apply");
//! conversation.settle_success().expect("transition should apply");
//!
//! assert_eq!(conversation.len(), 3);
//! assert_eq!(conversation.last().expect("reply").content, "Yes, we do.");
//! assert_eq!(conversation.phase(), TurnPhase::Settled(TurnOutcome::Success));
//! ```

use std::sync::Arc;

use crate::{ChatError, ChatMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Success,
    Error,
    /// The consumer detached before the reply finished.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    UserMessageAppended,
    ModelPlaceholderAppended,
    Streaming { fragments: usize },
    Settled(TurnOutcome),
}

impl TurnPhase {
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Self::UserMessageAppended | Self::ModelPlaceholderAppended | Self::Streaming { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Arc<ChatMessage>>,
    phase: TurnPhase,
    last_outcome: Option<TurnOutcome>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            phase: TurnPhase::Idle,
            last_outcome: None,
        }
    }

    pub fn with_greeting() -> Self {
        Self {
            messages: vec![Arc::new(ChatMessage::greeting())],
            phase: TurnPhase::Idle,
            last_outcome: None,
        }
    }

    pub fn messages(&self) -> &[Arc<ChatMessage>] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Arc<ChatMessage>> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// How the most recently finished turn ended.
    pub fn last_outcome(&self) -> Option<TurnOutcome> {
        self.last_outcome
    }

    /// Appends the user's message. A turn still in flight is settled as
    /// cancelled first and keeps whatever content it had.
    pub fn begin_turn(&mut self, content: impl Into<String>) -> Result<(), ChatError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ChatError::invalid_request("chat message must not be empty"));
        }

        if self.phase.is_in_flight() {
            self.settle(TurnOutcome::Cancelled);
        }

        self.messages.push(Arc::new(ChatMessage::user(content)));
        self.phase = TurnPhase::UserMessageAppended;
        Ok(())
    }

    pub fn append_placeholder(&mut self) -> Result<(), ChatError> {
        if self.phase != TurnPhase::UserMessageAppended {
            return Err(self.unexpected("append a reply placeholder"));
        }

        self.messages.push(Arc::new(ChatMessage::model(String::new())));
        self.phase = TurnPhase::ModelPlaceholderAppended;
        Ok(())
    }

    pub fn apply_fragment(&mut self, fragment: &str) -> Result<(), ChatError> {
        let fragments = match self.phase {
            TurnPhase::ModelPlaceholderAppended => 0,
            TurnPhase::Streaming { fragments } => fragments,
            _ => return Err(self.unexpected("apply a reply fragment")),
        };

        self.replace_tail(|tail| format!("{}{fragment}", tail.content))?;
        self.phase = TurnPhase::Streaming {
            fragments: fragments + 1,
        };
        Ok(())
    }

    pub fn settle_success(&mut self) -> Result<(), ChatError> {
        self.require_reply_started("settle a reply")?;
        self.settle(TurnOutcome::Success);
        Ok(())
    }

    /// Overwrites the reply with `apology`. Earlier messages are untouched.
    pub fn settle_error(&mut self, apology: &str) -> Result<(), ChatError> {
        self.require_reply_started("settle a failed reply")?;
        self.replace_tail(|_| apology.to_string())?;
        self.settle(TurnOutcome::Error);
        Ok(())
    }

    fn settle(&mut self, outcome: TurnOutcome) {
        self.phase = TurnPhase::Settled(outcome);
        self.last_outcome = Some(outcome);
    }

    fn require_reply_started(&self, action: &str) -> Result<(), ChatError> {
        match self.phase {
            TurnPhase::ModelPlaceholderAppended | TurnPhase::Streaming { .. } => Ok(()),
            _ => Err(self.unexpected(action)),
        }
    }

    fn replace_tail(&mut self, update: impl FnOnce(&ChatMessage) -> String) -> Result<(), ChatError> {
        let tail = self
            .messages
            .last_mut()
            .ok_or_else(|| ChatError::invalid_state("conversation has no reply to update"))?;
        let content = update(&**tail);
        *tail = Arc::new(tail.with_content(content));
        Ok(())
    }

    fn unexpected(&self, action: &str) -> ChatError {
        ChatError::invalid_state(format!("cannot {action} while {:?}", self.phase))
    }
}
