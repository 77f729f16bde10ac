//! Common `pumapromos` imports for the site.

pub use crate::{
    AppConfig, Assistant, AssistantError, AssistantErrorKind, ChatMessage, ChatRole, ChatSession,
    Message, ProviderId, QuoteDraft, QuoteEmail, QuoteField, QuoteRequest, QuoteResult,
    QuoteWizard, ReplyFragment, SendOutcome, Timeline, WizardError, WizardErrorKind, WizardStep,
    format_currency, init_logging,
};
