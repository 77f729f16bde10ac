use pcommon::BoxFuture;
use pquote::{QuoteRequest, QuoteResult};

use crate::{BoxedEventStream, Message, ProviderError, ProviderId};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// Capability shared by every vendor adapter and the mock fallback.
///
/// Implementations keep no conversation state. Callers pass the prior turns
/// on every chat call.
pub trait QuoteProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn generate_structured_quote<'a>(
        &'a self,
        request: &'a QuoteRequest,
    ) -> ProviderFuture<'a, Result<QuoteResult, ProviderError>>;

    fn stream_chat_reply<'a>(
        &'a self,
        history: Vec<Message>,
        message: String,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>>;
}
