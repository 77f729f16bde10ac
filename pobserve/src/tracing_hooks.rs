//! Tracing-based observability hooks for provider calls.
//!
//! ```rust
//! use pobserve::TracingObservabilityHooks;
//! use pprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, StreamSummary};
use pquote::QuoteCorrection;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_request_start(&self, provider: ProviderId, operation: &str) {
        tracing::info!(
            phase = "provider",
            event = "request_start",
            provider = %provider,
            operation
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, elapsed: Duration) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        elapsed: Duration,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            category = ?error.category(),
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_stream_complete(&self, provider: ProviderId, summary: &StreamSummary) {
        if summary.skipped_chunks > 0 {
            tracing::warn!(
                phase = "stream",
                event = "complete",
                provider = %provider,
                fragments = summary.fragments,
                skipped_chunks = summary.skipped_chunks,
                elapsed_ms = summary.elapsed.as_millis() as u64
            );
        } else {
            tracing::info!(
                phase = "stream",
                event = "complete",
                provider = %provider,
                fragments = summary.fragments,
                elapsed_ms = summary.elapsed.as_millis() as u64
            );
        }
    }

    fn on_mock_fallback(&self, provider: ProviderId) {
        tracing::warn!(
            phase = "selector",
            event = "mock_fallback",
            provider = %provider,
            credential = provider.credential_env_var(),
            "no credential configured; serving mock responses"
        );
    }

    fn on_quote_corrected(&self, provider: ProviderId, correction: &QuoteCorrection) {
        tracing::warn!(
            phase = "quote",
            event = "corrected",
            provider = %provider,
            correction = %correction
        );
    }
}
