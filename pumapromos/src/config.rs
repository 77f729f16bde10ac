//! Environment-driven settings for the assistant.
//!
//! ```rust
//! use std::time::Duration;
//! use pumapromos::{AppConfig, LogFormat, ProviderId};
//!
//! let config = AppConfig::from_lookup(|key| match key {
//!     "AI_PROVIDER" => Some("Claude".to_string()),
//!     "PUMAPROMOS_MOCK_LATENCY_MS" => Some("0".to_string()),
//!     _ => None,
//! })
//! .expect("config should load");
//!
//! assert_eq!(config.provider, ProviderId::Anthropic);
//! assert_eq!(config.mock_latency, Duration::ZERO);
//! assert_eq!(config.log_format, LogFormat::Compact);
//! assert!(config.is_mock_mode().expect("credentials readable"));
//! ```

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use pprovider::{DEFAULT_MOCK_LATENCY, DEFAULT_REQUEST_TIMEOUT, ProviderId, SecureCredentialManager};

use crate::AssistantError;

pub const ENV_PROVIDER: &str = "AI_PROVIDER";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PUMAPROMOS_REQUEST_TIMEOUT_SECS";
pub const ENV_MOCK_LATENCY_MS: &str = "PUMAPROMOS_MOCK_LATENCY_MS";
pub const ENV_LOG: &str = "PUMAPROMOS_LOG";
pub const ENV_LOG_FORMAT: &str = "PUMAPROMOS_LOG_FORMAT";

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub provider: ProviderId,
    pub request_timeout: Duration,
    pub mock_latency: Duration,
    pub log_filter: String,
    pub log_format: LogFormat,
    credentials: Arc<SecureCredentialManager>,
    warnings: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AssistantError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`. Values that fail to parse fall
    /// back to their defaults and are listed in [`AppConfig::warnings`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AssistantError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut warnings = Vec::new();

        let provider = match read(ENV_PROVIDER) {
            None => ProviderId::default(),
            Some(raw) => ProviderId::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "{ENV_PROVIDER}='{}' is not recognized; using {}",
                    raw.trim(),
                    ProviderId::default()
                ));
                ProviderId::default()
            }),
        };

        let request_timeout = read(ENV_REQUEST_TIMEOUT_SECS)
            .and_then(|raw| parse_positive(ENV_REQUEST_TIMEOUT_SECS, &raw, &mut warnings))
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let mock_latency = read(ENV_MOCK_LATENCY_MS)
            .and_then(|raw| parse_number(ENV_MOCK_LATENCY_MS, &raw, &mut warnings))
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MOCK_LATENCY);

        let log_filter = read(ENV_LOG)
            .map(|raw| raw.trim().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_format = match read(ENV_LOG_FORMAT) {
            None => LogFormat::default(),
            Some(raw) => raw.parse().unwrap_or_else(|message| {
                warnings.push(format!("{ENV_LOG_FORMAT}: {message}; using compact"));
                LogFormat::default()
            }),
        };

        let credentials = SecureCredentialManager::from_lookup(&read).map_err(|err| {
            AssistantError::configuration(format!("failed to load credentials: {err}"))
        })?;

        Ok(Self {
            provider,
            request_timeout,
            mock_latency,
            log_filter,
            log_format,
            credentials: Arc::new(credentials),
            warnings,
        })
    }

    pub fn credentials(&self) -> Arc<SecureCredentialManager> {
        Arc::clone(&self.credentials)
    }

    /// Whether the selected provider has no credential.
    pub fn is_mock_mode(&self) -> Result<bool, AssistantError> {
        self.credentials
            .has_credentials(self.provider)
            .map(|present| !present)
            .map_err(|err| AssistantError::configuration(err.to_string()))
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("request_timeout", &self.request_timeout)
            .field("mock_latency", &self.mock_latency)
            .field("log_filter", &self.log_filter)
            .field("log_format", &self.log_format)
            .field("mock_mode", &self.is_mock_mode().ok())
            .field("warnings", &self.warnings)
            .finish()
    }
}

fn parse_number(key: &str, raw: &str, warnings: &mut Vec<String>) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(format!("{key}='{}' is not a whole number; using the default", raw.trim()));
            None
        }
    }
}

fn parse_positive(key: &str, raw: &str, warnings: &mut Vec<String>) -> Option<u64> {
    match parse_number(key, raw, warnings)? {
        0 => {
            warnings.push(format!("{key} must be greater than zero; using the default"));
            None
        }
        value => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("config should load")
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config(&[]);

        assert_eq!(config.provider, ProviderId::Gemini);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.mock_latency, Duration::from_millis(2500));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.is_mock_mode().expect("credentials readable"));
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn provider_and_credentials_are_read_per_vendor() {
        let config = config(&[
            ("AI_PROVIDER", " OpenAI "),
            ("OPENAI_API_KEY", "sk-live"),
            ("GEMINI_API_KEY", "   "),
        ]);

        assert_eq!(config.provider, ProviderId::OpenAi);
        assert!(!config.is_mock_mode().expect("credentials readable"));
        assert!(
            !config
                .credentials()
                .has_credentials(ProviderId::Gemini)
                .expect("credentials readable")
        );
    }

    #[test]
    fn unusable_values_fall_back_with_warnings() {
        let config = config(&[
            ("AI_PROVIDER", "mistral"),
            ("PUMAPROMOS_REQUEST_TIMEOUT_SECS", "0"),
            ("PUMAPROMOS_MOCK_LATENCY_MS", "soon"),
            ("PUMAPROMOS_LOG_FORMAT", "xml"),
        ]);

        assert_eq!(config.provider, ProviderId::Gemini);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.mock_latency, DEFAULT_MOCK_LATENCY);
        assert_eq!(config.log_format, LogFormat::Compact);
        assert_eq!(config.warnings().len(), 4);
        assert!(config.warnings()[0].contains("mistral"));
    }

    #[test]
    fn debug_output_hides_keys() {
        let config = config(&[("GEMINI_API_KEY", "super-secret")]);

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("mock_mode: Some(false)"));
    }
}
