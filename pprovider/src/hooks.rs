//! Operational hook points fired by adapters, the mock fallback and the selector.
//!
//! ```rust
//! use std::sync::Arc;
//! use pprovider::{NoopOperationHooks, ProviderOperationHooks};
//!
//! let hooks: Arc<dyn ProviderOperationHooks> = Arc::new(NoopOperationHooks);
//! hooks.on_mock_fallback(pprovider::ProviderId::Gemini);
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_stream::stream;
use futures_util::StreamExt;
use pquote::QuoteCorrection;

use crate::{BoxedEventStream, ProviderError, ProviderId, StreamEvent};

pub const OPERATION_QUOTE: &str = "generate_structured_quote";
pub const OPERATION_CHAT: &str = "stream_chat_reply";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub fragments: usize,
    pub skipped_chunks: usize,
    pub elapsed: Duration,
}

pub trait ProviderOperationHooks: Send + Sync {
    fn on_request_start(&self, _provider: ProviderId, _operation: &str) {}

    fn on_success(&self, _provider: ProviderId, _operation: &str, _elapsed: Duration) {}

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _elapsed: Duration,
        _error: &ProviderError,
    ) {
    }

    fn on_stream_complete(&self, _provider: ProviderId, _summary: &StreamSummary) {}

    fn on_mock_fallback(&self, _provider: ProviderId) {}

    fn on_quote_corrected(&self, _provider: ProviderId, _correction: &QuoteCorrection) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}

pub(crate) fn noop_hooks() -> Arc<dyn ProviderOperationHooks> {
    Arc::new(NoopOperationHooks)
}

/// Runs one request/response call and reports its outcome.
pub async fn observe_call<T, F>(
    hooks: &dyn ProviderOperationHooks,
    provider: ProviderId,
    operation: &str,
    call: F,
) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    hooks.on_request_start(provider, operation);
    let started = Instant::now();

    let outcome = call.await;
    match &outcome {
        Ok(_) => hooks.on_success(provider, operation, started.elapsed()),
        Err(error) => hooks.on_failure(provider, operation, started.elapsed(), error),
    }

    outcome
}

/// Wraps a reply stream so fragments and skipped frames are counted.
///
/// `on_stream_complete` fires when the inner stream ends cleanly and
/// `on_failure` when it yields an error. A stream dropped early reports
/// nothing.
pub fn observe_stream<'a>(
    hooks: Arc<dyn ProviderOperationHooks>,
    provider: ProviderId,
    started: Instant,
    mut inner: BoxedEventStream<'a>,
) -> BoxedEventStream<'a> {
    let stream = stream! {
        let mut fragments = 0usize;
        let mut skipped_chunks = 0usize;

        while let Some(item) = inner.next().await {
            match item {
                Ok(event) => {
                    match &event {
                        StreamEvent::TextDelta(_) => fragments += 1,
                        StreamEvent::ChunkSkipped { .. } => skipped_chunks += 1,
                    }
                    yield Ok::<StreamEvent, ProviderError>(event);
                }
                Err(error) => {
                    hooks.on_failure(provider, OPERATION_CHAT, started.elapsed(), &error);
                    yield Err(error);
                    return;
                }
            }
        }

        hooks.on_stream_complete(
            provider,
            &StreamSummary {
                fragments,
                skipped_chunks,
                elapsed: started.elapsed(),
            },
        );
    };

    Box::pin(stream)
}
