//! Metrics-based observability hooks for provider calls.
//!
//! ```rust
//! use pobserve::MetricsObservabilityHooks;
//! use pprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, StreamSummary};
use pquote::QuoteCorrection;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

fn correction_kind(correction: &QuoteCorrection) -> &'static str {
    match correction {
        QuoteCorrection::Totals { .. } => "totals",
        QuoteCorrection::QuoteNumber { .. } => "quote_number",
        QuoteCorrection::ExtraProducts { .. } => "extra_products",
    }
}

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_request_start(&self, provider: ProviderId, operation: &str) {
        metrics::counter!(
            "pumapromos_provider_request_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_success(&self, provider: ProviderId, operation: &str, elapsed: Duration) {
        metrics::counter!(
            "pumapromos_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "pumapromos_provider_duration_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        elapsed: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "pumapromos_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "pumapromos_provider_duration_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_stream_complete(&self, provider: ProviderId, summary: &StreamSummary) {
        metrics::counter!(
            "pumapromos_provider_stream_fragments_total",
            "provider" => provider.to_string()
        )
        .increment(summary.fragments as u64);
        metrics::counter!(
            "pumapromos_provider_stream_skipped_chunks_total",
            "provider" => provider.to_string()
        )
        .increment(summary.skipped_chunks as u64);
        metrics::histogram!(
            "pumapromos_provider_stream_duration_seconds",
            "provider" => provider.to_string()
        )
        .record(summary.elapsed.as_secs_f64());
    }

    fn on_mock_fallback(&self, provider: ProviderId) {
        metrics::counter!(
            "pumapromos_provider_mock_fallback_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_quote_corrected(&self, provider: ProviderId, correction: &QuoteCorrection) {
        metrics::counter!(
            "pumapromos_provider_quote_corrected_total",
            "provider" => provider.to_string(),
            "correction" => correction_kind(correction)
        )
        .increment(1);
    }
}
