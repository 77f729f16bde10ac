use std::sync::Arc;
use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, StreamSummary};
use pquote::QuoteCorrection;

/// Forwards every callback to each registered hook, in order.
#[derive(Clone, Default)]
pub struct FanoutHooks {
    hooks: Vec<Arc<dyn ProviderOperationHooks>>,
}

impl FanoutHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: impl ProviderOperationHooks + 'static) -> Self {
        self.hooks.push(Arc::new(hooks));
        self
    }

    pub fn with_shared(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ProviderOperationHooks for FanoutHooks {
    fn on_request_start(&self, provider: ProviderId, operation: &str) {
        for hooks in &self.hooks {
            hooks.on_request_start(provider, operation);
        }
    }

    fn on_success(&self, provider: ProviderId, operation: &str, elapsed: Duration) {
        for hooks in &self.hooks {
            hooks.on_success(provider, operation, elapsed);
        }
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        elapsed: Duration,
        error: &ProviderError,
    ) {
        for hooks in &self.hooks {
            hooks.on_failure(provider, operation, elapsed, error);
        }
    }

    fn on_stream_complete(&self, provider: ProviderId, summary: &StreamSummary) {
        for hooks in &self.hooks {
            hooks.on_stream_complete(provider, summary);
        }
    }

    fn on_mock_fallback(&self, provider: ProviderId) {
        for hooks in &self.hooks {
            hooks.on_mock_fallback(provider);
        }
    }

    fn on_quote_corrected(&self, provider: ProviderId, correction: &QuoteCorrection) {
        for hooks in &self.hooks {
            hooks.on_quote_corrected(provider, correction);
        }
    }
}
