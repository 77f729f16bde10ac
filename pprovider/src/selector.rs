//! Picks the configured adapter, or the mock when its credential is missing.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pprovider::{ProviderId, ProviderSelector, ReqwestTransport, SecureCredentialManager};
//!
//! let transport = Arc::new(ReqwestTransport::new(reqwest::Client::new()));
//! let selector = ProviderSelector::new(
//!     ProviderId::from_config("claude"),
//!     Arc::new(SecureCredentialManager::new()),
//!     transport,
//! )
//! .with_mock_latency(Duration::ZERO);
//!
//! let active = selector.resolve().expect("selection should succeed");
//! assert!(active.is_mock());
//! assert_eq!(active.provider().id(), ProviderId::Anthropic);
//! ```

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::adapters::mock::{DEFAULT_MOCK_LATENCY, MockProvider};
use crate::hooks::noop_hooks;
use crate::transport::HttpTransport;
use crate::{ProviderError, ProviderId, ProviderOperationHooks, QuoteProvider, SecureCredentialManager};

#[derive(Clone)]
pub enum ActiveProvider {
    Live(Arc<dyn QuoteProvider>),
    Mock(Arc<MockProvider>),
}

impl ActiveProvider {
    pub fn provider(&self) -> Arc<dyn QuoteProvider> {
        match self {
            Self::Live(provider) => Arc::clone(provider),
            Self::Mock(mock) => Arc::clone(mock) as Arc<dyn QuoteProvider>,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock(_))
    }
}

impl std::fmt::Debug for ActiveProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live(provider) => write!(f, "ActiveProvider::Live({})", provider.id()),
            Self::Mock(mock) => write!(f, "ActiveProvider::Mock({})", mock.id()),
        }
    }
}

/// Builds the adapter for `provider` once and hands out the same instance.
pub struct ProviderSelector {
    provider: ProviderId,
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
    mock_latency: Duration,
    active: OnceLock<ActiveProvider>,
}

impl ProviderSelector {
    pub fn new(
        provider: ProviderId,
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            provider,
            credentials,
            transport,
            hooks: noop_hooks(),
            mock_latency: DEFAULT_MOCK_LATENCY,
            active: OnceLock::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_mock_latency(mut self, latency: Duration) -> Self {
        self.mock_latency = latency;
        self
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider
    }

    pub fn hooks(&self) -> Arc<dyn ProviderOperationHooks> {
        Arc::clone(&self.hooks)
    }

    /// Whether the configured provider lacks a credential.
    pub fn is_mock_mode(&self) -> Result<bool, ProviderError> {
        Ok(!self.credentials.has_credentials(self.provider)?)
    }

    pub fn resolve(&self) -> Result<ActiveProvider, ProviderError> {
        if let Some(active) = self.active.get() {
            return Ok(active.clone());
        }

        let built = if self.is_mock_mode()? {
            ActiveProvider::Mock(Arc::new(
                MockProvider::new(self.provider).with_latency(self.mock_latency),
            ))
        } else {
            ActiveProvider::Live(build_provider(
                self.provider,
                Arc::clone(&self.credentials),
                Arc::clone(&self.transport),
                Arc::clone(&self.hooks),
            )?)
        };

        // A racing caller may have won; the stored instance is authoritative.
        if self.active.set(built.clone()).is_ok() && built.is_mock() {
            self.hooks.on_mock_fallback(self.provider);
        }

        Ok(self.active.get().cloned().unwrap_or(built))
    }
}

pub fn build_provider(
    provider: ProviderId,
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn QuoteProvider>, ProviderError> {
    match provider {
        #[cfg(feature = "provider-gemini")]
        ProviderId::Gemini => Ok(Arc::new(
            crate::adapters::gemini::GeminiProvider::new(credentials, transport).with_hooks(hooks),
        )),
        #[cfg(feature = "provider-openai")]
        ProviderId::OpenAi => Ok(Arc::new(
            crate::adapters::openai::OpenAiProvider::new(credentials, transport).with_hooks(hooks),
        )),
        #[cfg(feature = "provider-anthropic")]
        ProviderId::Anthropic => Ok(Arc::new(
            crate::adapters::anthropic::AnthropicProvider::new(credentials, transport)
                .with_hooks(hooks),
        )),
        #[allow(unreachable_patterns)]
        other => {
            let _ = (credentials, transport, hooks);
            Err(ProviderError::invalid_request(format!(
                "provider '{other}' is not enabled in this build"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::transport::{ByteStream, HttpRequest, VendorAuth};
    use crate::ProviderFuture;

    #[derive(Debug, Default)]
    struct UnusedTransport;

    impl HttpTransport for UnusedTransport {
        fn post_json<'a>(
            &'a self,
            _request: HttpRequest,
            _auth: VendorAuth,
        ) -> ProviderFuture<'a, Result<String, ProviderError>> {
            Box::pin(async { Err(ProviderError::other("no network in tests")) })
        }

        fn post_stream<'a>(
            &'a self,
            _request: HttpRequest,
            _auth: VendorAuth,
        ) -> ProviderFuture<'a, Result<ByteStream<'a>, ProviderError>> {
            Box::pin(async { Err(ProviderError::other("no network in tests")) })
        }
    }

    #[derive(Default)]
    struct FallbackCounter {
        fallbacks: Mutex<Vec<ProviderId>>,
    }

    impl ProviderOperationHooks for FallbackCounter {
        fn on_mock_fallback(&self, provider: ProviderId) {
            self.fallbacks.lock().expect("fallback lock").push(provider);
        }
    }

    fn selector(provider: ProviderId, credentials: SecureCredentialManager) -> ProviderSelector {
        ProviderSelector::new(provider, Arc::new(credentials), Arc::new(UnusedTransport))
            .with_mock_latency(Duration::ZERO)
    }

    #[test]
    fn missing_credential_selects_mock_for_every_provider() {
        for provider in ProviderId::ALL {
            let credentials = SecureCredentialManager::new();
            // A key for some other vendor does not help.
            for other in ProviderId::ALL.into_iter().filter(|other| *other != provider) {
                credentials.set_api_key(other, "key").expect("key should store");
            }

            let active = selector(provider, credentials)
                .resolve()
                .expect("selection should succeed");
            assert!(active.is_mock(), "{provider} should be mocked");
            assert_eq!(active.provider().id(), provider);
        }
    }

    #[test]
    fn configured_credential_selects_live_adapter_once() {
        let credentials = SecureCredentialManager::new();
        credentials
            .set_api_key(ProviderId::OpenAi, "sk-test")
            .expect("key should store");
        let selector = selector(ProviderId::OpenAi, credentials);

        let first = selector.resolve().expect("selection should succeed");
        let second = selector.resolve().expect("selection should succeed");

        assert!(!first.is_mock());
        assert_eq!(first.provider().id(), ProviderId::OpenAi);
        assert!(Arc::ptr_eq(&first.provider(), &second.provider()));
    }

    #[test]
    fn mock_fallback_is_reported_once() {
        let hooks = Arc::new(FallbackCounter::default());
        let selector = selector(ProviderId::Anthropic, SecureCredentialManager::new())
            .with_hooks(hooks.clone());

        for _ in 0..3 {
            selector.resolve().expect("selection should succeed");
        }

        assert_eq!(
            *hooks.fallbacks.lock().expect("fallback lock"),
            vec![ProviderId::Anthropic]
        );
    }
}
