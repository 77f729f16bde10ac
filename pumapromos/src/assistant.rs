//! Single entry point the site uses for quotes and chat.
//!
//! ```rust
//! use pumapromos::prelude::*;
//!
//! let config = AppConfig::from_lookup(|key| {
//!     (key == "PUMAPROMOS_MOCK_LATENCY_MS").then(|| "0".to_string())
//! })
//! .expect("config should load");
//! let assistant = Assistant::from_config(&config).expect("assistant should build");
//!
//! assert!(assistant.is_mock_mode().expect("credentials readable"));
//! assert_eq!(assistant.provider_id(), ProviderId::Gemini);
//! ```

use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;
use pchat::{ChatResponder, ChatService, ChatSession, ReplyFragment, ReplyStream};
use pobserve::{FanoutHooks, MetricsObservabilityHooks, SafeProviderHooks, TracingObservabilityHooks};
use pprovider::{
    Message, ProviderError, ProviderId, ProviderSelector, QuoteProvider, ReqwestTransport,
};
use pquote::{QuoteRequest, QuoteResult};

use crate::{AppConfig, AssistantError};

pub struct Assistant {
    selector: ProviderSelector,
}

impl Assistant {
    pub fn new(selector: ProviderSelector) -> Self {
        Self { selector }
    }

    /// Wires the reqwest transport and tracing plus metrics hooks.
    pub fn from_config(config: &AppConfig) -> Result<Self, AssistantError> {
        let transport = ReqwestTransport::with_timeout(config.request_timeout)
            .map_err(|err| AssistantError::configuration(err.to_string()))?;
        let hooks = FanoutHooks::new()
            .with(SafeProviderHooks::new(TracingObservabilityHooks))
            .with(SafeProviderHooks::new(MetricsObservabilityHooks));

        let selector =
            ProviderSelector::new(config.provider, config.credentials(), Arc::new(transport))
                .with_hooks(Arc::new(hooks))
                .with_mock_latency(config.mock_latency);

        Ok(Self::new(selector))
    }

    pub fn provider_id(&self) -> ProviderId {
        self.selector.provider_id()
    }

    pub fn is_mock_mode(&self) -> Result<bool, AssistantError> {
        self.selector
            .is_mock_mode()
            .map_err(|err| AssistantError::configuration(err.to_string()))
    }

    /// Validates locally, then asks the active provider (or the mock).
    ///
    /// Provider failures are logged and replaced by one user-safe error.
    pub async fn generate_quote(&self, request: &QuoteRequest) -> Result<QuoteResult, AssistantError> {
        request.validate()?;

        let provider = self.provider().map_err(|error| {
            self.log_failure("generate_quote", &error);
            AssistantError::quote_generation_failed()
        })?;

        provider
            .generate_structured_quote(request)
            .await
            .map_err(|error| {
                self.log_failure("generate_quote", &error);
                AssistantError::quote_generation_failed()
            })
    }

    /// Streams a reply to `message` given an explicit `history`.
    ///
    /// Never fails: provider errors end the stream with an apology fragment.
    /// Blank messages produce an empty stream without a network call.
    pub fn stream_chat_response<'a>(
        &'a self,
        history: Vec<Message>,
        message: String,
    ) -> ReplyStream<'a> {
        Box::pin(stream! {
            if message.trim().is_empty() {
                return;
            }

            let provider = match self.provider() {
                Ok(provider) => provider,
                Err(error) => {
                    self.log_failure("stream_chat_response", &error);
                    yield ReplyFragment::Apology(error);
                    return;
                }
            };

            let responder = ChatResponder::new(provider);
            let mut replies = responder.respond(history, message);
            while let Some(fragment) = replies.next().await {
                if let ReplyFragment::Apology(cause) = &fragment {
                    self.log_failure("stream_chat_response", cause);
                }
                yield fragment;
            }
        })
    }

    /// A fresh sidebar session with its own transcript.
    pub fn chat_session(&self) -> Result<ChatSession, AssistantError> {
        let provider = self
            .provider()
            .map_err(|err| AssistantError::configuration(err.to_string()))?;
        Ok(ChatSession::new(Arc::new(ChatService::new(provider))))
    }

    fn provider(&self) -> Result<Arc<dyn QuoteProvider>, ProviderError> {
        self.selector.resolve().map(|active| active.provider())
    }

    fn log_failure(&self, operation: &str, error: &ProviderError) {
        tracing::error!(
            phase = "assistant",
            event = "failure",
            provider = %self.selector.provider_id(),
            operation,
            error_kind = ?error.kind,
            category = ?error.category(),
            error = %error
        );
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("provider", &self.selector.provider_id())
            .finish()
    }
}
