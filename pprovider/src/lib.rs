//! Vendor adapters behind one quote/chat capability trait.
//!
//! ```rust
//! use std::sync::Arc;
//! use pprovider::prelude::*;
//!
//! let credentials = Arc::new(SecureCredentialManager::new());
//! credentials.set_api_key(ProviderId::OpenAi, "sk-test").expect("key should store");
//!
//! let transport = Arc::new(ReqwestTransport::new(reqwest::Client::new()));
//! let selector = ProviderSelector::new(ProviderId::OpenAi, credentials, transport);
//! let active = selector.resolve().expect("selection should succeed");
//!
//! assert!(!active.is_mock());
//! assert_eq!(active.provider().id(), ProviderId::OpenAi);
//! ```

pub mod adapters;
pub mod credentials;
pub mod error;
pub mod hooks;
pub mod model;
pub mod prelude;
pub mod provider;
pub mod selector;
pub mod sse;
pub mod stream;
pub mod transport;

#[cfg(feature = "provider-anthropic")]
pub use adapters::anthropic::{ANTHROPIC_BASE_URL, ANTHROPIC_VERSION, AnthropicProvider};
#[cfg(feature = "provider-gemini")]
pub use adapters::gemini::{GEMINI_BASE_URL, GeminiProvider};
pub use adapters::mock::{DEFAULT_MOCK_LATENCY, MockProvider};
#[cfg(feature = "provider-openai")]
pub use adapters::openai::{OPENAI_BASE_URL, OpenAiProvider};
pub use credentials::{SecretString, SecureCredentialManager};
pub use error::{FailureCategory, ProviderError, ProviderErrorKind};
pub use hooks::{
    NoopOperationHooks, OPERATION_CHAT, OPERATION_QUOTE, ProviderOperationHooks, StreamSummary,
    observe_call, observe_stream,
};
pub use model::{Message, ProviderId, Role};
pub use provider::{ProviderFuture, QuoteProvider};
pub use selector::{ActiveProvider, ProviderSelector, build_provider};
pub use stream::{BoxedEventStream, ModelEventStream, StreamEvent, VecEventStream};
pub use transport::{
    ByteStream, DEFAULT_REQUEST_TIMEOUT, HttpRequest, HttpTransport, ReqwestTransport, VendorAuth,
};
