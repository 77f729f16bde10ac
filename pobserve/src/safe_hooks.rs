use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, StreamSummary};
use pquote::QuoteCorrection;

/// Keeps a panicking hook from unwinding into a provider call.
pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_request_start(&self, provider: ProviderId, operation: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_request_start(provider, operation)
        }));
    }

    fn on_success(&self, provider: ProviderId, operation: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, elapsed)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        elapsed: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, elapsed, error)
        }));
    }

    fn on_stream_complete(&self, provider: ProviderId, summary: &StreamSummary) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_stream_complete(provider, summary)
        }));
    }

    fn on_mock_fallback(&self, provider: ProviderId) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_mock_fallback(provider)));
    }

    fn on_quote_corrected(&self, provider: ProviderId, correction: &QuoteCorrection) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_quote_corrected(provider, correction)
        }));
    }
}
