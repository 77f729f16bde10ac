//! Provider identifiers and chat transcript messages.
//!
//! ```rust
//! use pprovider::{Message, ProviderId, Role};
//!
//! assert_eq!(ProviderId::from_config("Claude"), ProviderId::Anthropic);
//! assert_eq!(ProviderId::from_config("unknown-vendor"), ProviderId::Gemini);
//! assert_eq!(ProviderId::OpenAi.credential_env_var(), "OPENAI_API_KEY");
//!
//! let message = Message::new(Role::User, "Do you sell tote bags?");
//! assert_eq!(message.role, Role::User);
//! ```

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderId {
    #[default]
    Gemini,
    OpenAi,
    Anthropic,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Gemini, ProviderId::OpenAi, ProviderId::Anthropic];

    /// Recognized names and aliases, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai" => Some(Self::OpenAi),
            "anthropic" | "claude" => Some(Self::Anthropic),
            _ => None,
        }
    }

    /// Like [`ProviderId::parse`], but unrecognized values select the default.
    pub fn from_config(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn credential_env_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        };

        f.write_str(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases_and_rejects_unknown_values() {
        assert_eq!(ProviderId::parse(" GOOGLE "), Some(ProviderId::Gemini));
        assert_eq!(ProviderId::parse("OpenAI"), Some(ProviderId::OpenAi));
        assert_eq!(ProviderId::parse("anthropic"), Some(ProviderId::Anthropic));
        assert_eq!(ProviderId::parse("mistral"), None);
        assert_eq!(ProviderId::parse(""), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for provider in ProviderId::ALL {
            assert_eq!(ProviderId::parse(&provider.to_string()), Some(provider));
        }
    }
}
