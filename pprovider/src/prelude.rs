pub use crate::{
    ActiveProvider, BoxedEventStream, FailureCategory, HttpTransport, Message, MockProvider,
    NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderId, ProviderOperationHooks,
    ProviderSelector, QuoteProvider, ReqwestTransport, Role, SecureCredentialManager, StreamEvent,
};
