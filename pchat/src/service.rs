//! Per-session transcript with a single outstanding reply.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_stream::stream;
use futures_util::StreamExt;
use pcommon::SessionId;
use pprovider::{Message, QuoteProvider};

use crate::{ChatError, ChatResponder, ReplyFragment, ReplyStream};

/// Owns one chat session's transcript.
///
/// The user/model pair of a turn is committed only after its reply stream
/// finishes without an apology. Dropping the stream early commits nothing.
pub struct ChatService {
    session_id: SessionId,
    responder: ChatResponder,
    transcript: Mutex<Vec<Message>>,
    in_flight: AtomicBool,
}

impl ChatService {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_session_id(SessionId::generate(), provider)
    }

    pub fn with_session_id(session_id: SessionId, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            session_id,
            responder: ChatResponder::new(provider),
            transcript: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn responder(&self) -> &ChatResponder {
        &self.responder
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn transcript(&self) -> Result<Vec<Message>, ChatError> {
        self.transcript
            .lock()
            .map(|transcript| transcript.clone())
            .map_err(|_| ChatError::invalid_state("transcript lock poisoned"))
    }

    pub fn clear(&self) -> Result<(), ChatError> {
        if self.is_busy() {
            return Err(ChatError::busy("cannot clear while a reply is streaming"));
        }

        self.transcript
            .lock()
            .map(|mut transcript| transcript.clear())
            .map_err(|_| ChatError::invalid_state("transcript lock poisoned"))
    }

    /// Starts a reply to `message` against the current transcript.
    ///
    /// Fails with `Busy` while an earlier reply stream is still alive.
    pub fn stream_reply(&self, message: impl Into<String>) -> Result<ReplyStream<'_>, ChatError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ChatError::invalid_request("chat message must not be empty"));
        }

        let guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            ChatError::busy(format!(
                "session {} already has a reply in progress",
                self.session_id
            ))
        })?;
        let history = self.transcript()?;
        let mut replies = self.responder.respond(history, message.clone());

        Ok(Box::pin(stream! {
            let _guard = guard;
            let mut reply = String::new();
            let mut failed = false;

            while let Some(fragment) = replies.next().await {
                match &fragment {
                    ReplyFragment::Text(text) => reply.push_str(text),
                    ReplyFragment::Apology(_) => failed = true,
                }
                yield fragment;
            }

            if !failed {
                self.commit(message, reply);
            }
        }))
    }

    fn commit(&self, message: String, reply: String) {
        let mut transcript = self
            .transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        transcript.push(Message::user(message));
        transcript.push(Message::assistant(reply));
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("session_id", &self.session_id)
            .field("responder", &self.responder)
            .field("busy", &self.is_busy())
            .finish()
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pprovider::{MockProvider, ProviderId, Role};

    use super::*;
    use crate::ChatErrorKind;

    fn service() -> ChatService {
        ChatService::with_session_id(
            SessionId::from("chat-test"),
            Arc::new(MockProvider::new(ProviderId::OpenAi).with_latency(Duration::ZERO)),
        )
    }

    #[tokio::test]
    async fn completed_reply_commits_the_pair() {
        let service = service();

        let fragments = service
            .stream_reply("Hi there")
            .expect("reply should start")
            .collect::<Vec<_>>()
            .await;

        assert_eq!(fragments.len(), 1);
        let transcript = service.transcript().expect("transcript should read");
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[0].content, "Hi there");
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[1].content, pquote::MOCK_CHAT_REPLY);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn second_reply_is_busy_until_the_first_is_dropped() {
        let service = service();

        let first = service.stream_reply("one").expect("first reply should start");
        let error = service
            .stream_reply("two")
            .err()
            .expect("second reply should be rejected");
        assert_eq!(error.kind, ChatErrorKind::Busy);
        assert!(service.clear().is_err());

        drop(first);
        assert!(!service.is_busy());
        assert!(service.stream_reply("three").is_ok());
        assert!(service.transcript().expect("transcript").is_empty());
    }

    #[test]
    fn blank_messages_are_rejected_without_taking_the_guard() {
        let service = service();

        let error = service.stream_reply(" \n").err().expect("blank input");

        assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
        assert!(!service.is_busy());
    }
}
