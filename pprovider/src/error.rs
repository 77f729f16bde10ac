//! Provider error kinds and error value helpers.
//!
//! ```rust
//! use pprovider::{FailureCategory, ProviderError};
//!
//! let auth = ProviderError::authentication("bad key");
//! assert!(!auth.retryable);
//! assert_eq!(auth.category(), FailureCategory::ProviderUnavailable);
//!
//! let malformed = ProviderError::malformed_response("missing products");
//! assert_eq!(malformed.category(), FailureCategory::MalformedResponse);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use pquote::QuoteParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    Unavailable,
    MalformedResponse,
    Other,
}

/// Coarse failure classes surfaced to callers above the adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    MalformedResponse,
    ProviderUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message, true)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message, false)
    }

    pub fn category(&self) -> FailureCategory {
        match self.kind {
            ProviderErrorKind::MalformedResponse => FailureCategory::MalformedResponse,
            _ => FailureCategory::ProviderUnavailable,
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

impl From<QuoteParseError> for ProviderError {
    fn from(error: QuoteParseError) -> Self {
        Self::malformed_response(error.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_non_parse_failure_is_provider_unavailable() {
        for error in [
            ProviderError::authentication("a"),
            ProviderError::rate_limited("b"),
            ProviderError::invalid_request("c"),
            ProviderError::timeout("d"),
            ProviderError::transport("e"),
            ProviderError::unavailable("f"),
            ProviderError::other("g"),
        ] {
            assert_eq!(error.category(), FailureCategory::ProviderUnavailable);
        }
    }

    #[test]
    fn parse_errors_convert_to_malformed_response() {
        let error = ProviderError::from(QuoteParseError::new("missing field `total`"));

        assert_eq!(error.kind, ProviderErrorKind::MalformedResponse);
        assert!(!error.retryable);
        assert_eq!(error.to_string(), "MalformedResponse: missing field `total`");
    }
}
