//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

use crate::{AppConfig, DEFAULT_LOG_FILTER, LogFormat};

/// Installs the global fmt subscriber and replays config warnings through it.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is left alone.
pub fn init_logging(config: &AppConfig) -> bool {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| {
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let installed = match config.log_format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter(filter)
            .compact()
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter(filter)
            .json()
            .try_init()
            .is_ok(),
    };

    for warning in config.warnings() {
        tracing::warn!(phase = "config", event = "fallback", "{warning}");
    }
    tracing::info!(
        phase = "config",
        event = "loaded",
        provider = %config.provider,
        log_format = config.log_format.as_str(),
        request_timeout_secs = config.request_timeout.as_secs()
    );

    installed
}
