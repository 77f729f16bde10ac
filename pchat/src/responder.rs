//! Turns provider event streams into fragments the sidebar can always show.

use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use futures_core::Stream;
use futures_util::StreamExt;
use pprovider::{Message, ProviderError, QuoteProvider, StreamEvent};

use crate::CHAT_APOLOGY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyFragment {
    Text(String),
    /// Terminal. The cause is kept for logging and never shown.
    Apology(ProviderError),
}

impl ReplyFragment {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Apology(_) => CHAT_APOLOGY,
        }
    }

    pub fn is_apology(&self) -> bool {
        matches!(self, Self::Apology(_))
    }
}

pub type ReplyStream<'a> = Pin<Box<dyn Stream<Item = ReplyFragment> + Send + 'a>>;

/// Chat half of the assistant facade. Holds no transcript.
#[derive(Clone)]
pub struct ChatResponder {
    provider: Arc<dyn QuoteProvider>,
}

impl ChatResponder {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn QuoteProvider> {
        &self.provider
    }

    /// Never fails. Provider errors, whether raised before or during the
    /// stream, end it with a single apology fragment. So does a reply that
    /// finishes without any text.
    pub fn respond<'a>(&'a self, history: Vec<Message>, message: String) -> ReplyStream<'a> {
        Box::pin(stream! {
            let mut events = match self.provider.stream_chat_reply(history, message).await {
                Ok(events) => events,
                Err(error) => {
                    yield ReplyFragment::Apology(error);
                    return;
                }
            };

            let mut has_text = false;
            while let Some(event) = events.next().await {
                match event {
                    Ok(StreamEvent::TextDelta(text)) => {
                        has_text |= !text.trim().is_empty();
                        yield ReplyFragment::Text(text);
                    }
                    Ok(StreamEvent::ChunkSkipped { .. }) => {}
                    Err(error) => {
                        yield ReplyFragment::Apology(error);
                        return;
                    }
                }
            }

            if !has_text {
                yield ReplyFragment::Apology(ProviderError::malformed_response(
                    "reply stream ended without any text",
                ));
            }
        })
    }
}

impl std::fmt::Debug for ChatResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatResponder")
            .field("provider", &self.provider.id())
            .finish()
    }
}
