//! Observability hooks for provider calls, chat streams and mock fallback.
//!
//! ```rust
//! use std::sync::Arc;
//! use pobserve::{MetricsObservabilityHooks, SafeProviderHooks, TracingObservabilityHooks};
//! use pprovider::ProviderOperationHooks;
//!
//! let hooks: Arc<dyn ProviderOperationHooks> =
//!     Arc::new(SafeProviderHooks::new(TracingObservabilityHooks));
//! let _metrics = MetricsObservabilityHooks;
//! hooks.on_mock_fallback(pprovider::ProviderId::Gemini);
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout::FanoutHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeProviderHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        FanoutHooks, MetricsObservabilityHooks, SafeProviderHooks, TracingObservabilityHooks,
    };
}
