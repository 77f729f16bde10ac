//! Errors the site UI is allowed to see.

use std::error::Error;
use std::fmt::{Display, Formatter};

use pquote::ValidationErrors;

pub const QUOTE_FAILURE_MESSAGE: &str =
    "We couldn't generate your quote. Please try again or contact our team.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantErrorKind {
    QuoteGenerationFailed,
    Validation,
    Configuration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantError {
    pub kind: AssistantErrorKind,
    pub message: String,
    pub validation: Option<ValidationErrors>,
}

impl AssistantError {
    pub fn new(kind: AssistantErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            validation: None,
        }
    }

    /// Carries only the user-safe text; the cause is logged where it happens.
    pub fn quote_generation_failed() -> Self {
        Self::new(AssistantErrorKind::QuoteGenerationFailed, QUOTE_FAILURE_MESSAGE)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Configuration, message)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            kind: AssistantErrorKind::Validation,
            message: errors.to_string(),
            validation: Some(errors),
        }
    }
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for AssistantError {}

impl From<ValidationErrors> for AssistantError {
    fn from(value: ValidationErrors) -> Self {
        AssistantError::validation(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardErrorKind {
    Validation,
    AlreadySubmitted,
    NotReady,
    GenerationFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardError {
    pub kind: WizardErrorKind,
    pub message: String,
    pub validation: Option<ValidationErrors>,
}

impl WizardError {
    pub fn new(kind: WizardErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            validation: None,
        }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            kind: WizardErrorKind::Validation,
            message: errors.to_string(),
            validation: Some(errors),
        }
    }

    pub fn already_submitted() -> Self {
        Self::new(
            WizardErrorKind::AlreadySubmitted,
            "this quote request was already submitted",
        )
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::new(WizardErrorKind::NotReady, message)
    }
}

impl Display for WizardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for WizardError {}

impl From<ValidationErrors> for WizardError {
    fn from(value: ValidationErrors) -> Self {
        WizardError::validation(value)
    }
}

impl From<AssistantError> for WizardError {
    fn from(value: AssistantError) -> Self {
        match value.validation {
            Some(errors) => WizardError::validation(errors),
            None => WizardError::new(WizardErrorKind::GenerationFailed, value.message),
        }
    }
}
