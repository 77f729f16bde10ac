//! Quote wizard and chat assistant facade for the PumaPromos site.
//!
//! This crate is the single dependency the site needs. It loads settings
//! from the environment, installs logging, picks a vendor adapter (or the
//! mock when no key is configured) and exposes the quote and chat flows.
//!
//! ```rust
//! use pumapromos::prelude::*;
//!
//! let config = AppConfig::from_lookup(|key| {
//!     (key == "PUMAPROMOS_MOCK_LATENCY_MS").then(|| "0".to_string())
//! })
//! .expect("config should load");
//! let assistant = Assistant::from_config(&config).expect("assistant should build");
//! let mut wizard = QuoteWizard::new();
//!
//! wizard.draft_mut().use_case = "Client Gifts".to_string();
//! wizard.draft_mut().recipient_count = "25".to_string();
//! assert_eq!(wizard.next_step().expect("details are valid"), WizardStep::Preferences);
//! assert!(assistant.is_mock_mode().expect("credentials readable"));
//! ```

mod assistant;
mod config;
mod error;
mod wizard;

pub mod logging;
pub mod prelude;

pub use pchat;
pub use pcommon;
pub use pobserve;
pub use pprovider;
pub use pquote;

pub use assistant::Assistant;
pub use config::{
    AppConfig, DEFAULT_LOG_FILTER, ENV_LOG, ENV_LOG_FORMAT, ENV_MOCK_LATENCY_MS, ENV_PROVIDER,
    ENV_REQUEST_TIMEOUT_SECS, LogFormat,
};
pub use error::{
    AssistantError, AssistantErrorKind, QUOTE_FAILURE_MESSAGE, WizardError, WizardErrorKind,
};
pub use logging::init_logging;
pub use wizard::{QuoteEmail, QuoteWizard, WizardStep};

pub use pchat::{
    CHAT_APOLOGY, ChatMessage, ChatRole, ChatSession, Conversation, ConversationSnapshot,
    ReplyFragment, ReplyStream, SendOutcome, TurnOutcome, TurnPhase,
};
pub use pprovider::{Message, ProviderId, Role};
pub use pquote::{
    QuoteDraft, QuoteField, QuoteRequest, QuoteResult, RecommendedProduct, Timeline,
    ValidationErrors, format_currency,
};
