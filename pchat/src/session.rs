//! Sidebar-facing chat session with observable conversation state.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use futures_util::FutureExt;
//! use pchat::{ChatService, ChatSession, SendOutcome};
//! use pprovider::{MockProvider, ProviderId};
//!
//! let provider = Arc::new(MockProvider::new(ProviderId::Gemini).with_latency(Duration::ZERO));
//! let mut session = ChatSession::new(Arc::new(ChatService::new(provider)));
//! let updates = session.subscribe();
//!
//! let outcome = session
//!     .send("What are your minimums?")
//!     .now_or_never()
//!     .expect("mock replies are ready immediately")
//!     .expect("send should run");
//!
//! assert_eq!(outcome, SendOutcome::Completed);
//! assert_eq!(updates.borrow().messages.len(), 3);
//! ```

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;

use crate::{
    CONNECTION_APOLOGY, ChatError, ChatMessage, ChatService, Conversation, ReplyFragment, TurnPhase,
};

/// What observers see after every state change.
#[derive(Debug, Clone)]
pub struct ConversationSnapshot {
    pub messages: Vec<Arc<ChatMessage>>,
    pub phase: TurnPhase,
}

impl ConversationSnapshot {
    fn of(conversation: &Conversation) -> Self {
        Self {
            messages: conversation.messages().to_vec(),
            phase: conversation.phase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing changed.
    Ignored,
    Completed,
    /// The reply was replaced by an apology.
    Apologized,
}

pub struct ChatSession {
    service: Arc<ChatService>,
    conversation: Conversation,
    updates: watch::Sender<ConversationSnapshot>,
}

impl ChatSession {
    pub fn new(service: Arc<ChatService>) -> Self {
        let conversation = Conversation::with_greeting();
        let (updates, _) = watch::channel(ConversationSnapshot::of(&conversation));
        Self {
            service,
            conversation,
            updates,
        }
    }

    pub fn service(&self) -> &Arc<ChatService> {
        &self.service
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.updates.subscribe()
    }

    /// Sends `input` and consumes the whole reply, publishing a snapshot
    /// after each step.
    ///
    /// A `Busy` error leaves the conversation untouched. Provider failures
    /// are not errors here; they settle the turn with an apology.
    /// Dropping the returned future detaches the turn, which the next send
    /// settles as cancelled.
    pub async fn send(&mut self, input: &str) -> Result<SendOutcome, ChatError> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let opened = self.service.stream_reply(text);
        if let Err(error) = &opened
            && error.is_busy()
        {
            return Err(error.clone());
        }

        self.conversation.begin_turn(text)?;
        self.publish();
        self.conversation.append_placeholder()?;
        self.publish();

        let mut replies = match opened {
            Ok(replies) => replies,
            Err(_) => {
                self.conversation.settle_error(CONNECTION_APOLOGY)?;
                self.publish();
                return Ok(SendOutcome::Apologized);
            }
        };

        while let Some(fragment) = replies.next().await {
            match fragment {
                ReplyFragment::Text(text) => {
                    self.conversation.apply_fragment(&text)?;
                    self.publish();
                }
                apology @ ReplyFragment::Apology(_) => {
                    self.conversation.settle_error(apology.text())?;
                    self.publish();
                    return Ok(SendOutcome::Apologized);
                }
            }
        }

        self.conversation.settle_success()?;
        self.publish();
        Ok(SendOutcome::Completed)
    }

    /// Starts over from the greeting with an empty transcript.
    pub fn reset(&mut self) -> Result<(), ChatError> {
        self.service.clear()?;
        self.conversation = Conversation::with_greeting();
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        self.updates
            .send_replace(ConversationSnapshot::of(&self.conversation));
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("service", &self.service)
            .field("messages", &self.conversation.len())
            .field("phase", &self.conversation.phase())
            .finish()
    }
}
