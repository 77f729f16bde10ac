//! Credential-free stand-in used for local and demo runs.

use std::time::Duration;

use futures_timer::Delay;
use pquote::{MOCK_CHAT_REPLY, QuoteRequest, QuoteResult, mock_quote};

use crate::{
    BoxedEventStream, Message, ProviderError, ProviderFuture, ProviderId, QuoteProvider,
    VecEventStream,
};

pub const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(2500);

/// Serves the fixed example catalog and a canned chat reply.
///
/// ```rust
/// use std::time::Duration;
/// use pprovider::{MockProvider, ProviderId, QuoteProvider};
///
/// let mock = MockProvider::new(ProviderId::OpenAi).with_latency(Duration::ZERO);
/// assert_eq!(mock.id(), ProviderId::OpenAi);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    stands_in_for: ProviderId,
    latency: Duration,
}

impl MockProvider {
    pub fn new(stands_in_for: ProviderId) -> Self {
        Self {
            stands_in_for,
            latency: DEFAULT_MOCK_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl QuoteProvider for MockProvider {
    fn id(&self) -> ProviderId {
        self.stands_in_for
    }

    fn generate_structured_quote<'a>(
        &'a self,
        request: &'a QuoteRequest,
    ) -> ProviderFuture<'a, Result<QuoteResult, ProviderError>> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                Delay::new(self.latency).await;
            }
            Ok(mock_quote(request))
        })
    }

    fn stream_chat_reply<'a>(
        &'a self,
        _history: Vec<Message>,
        _message: String,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            Ok(Box::pin(VecEventStream::text([MOCK_CHAT_REPLY])) as BoxedEventStream<'a>)
        })
    }
}
