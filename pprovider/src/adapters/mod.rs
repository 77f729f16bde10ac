//! Vendor adapters and the shared plumbing they use.

#[cfg(feature = "provider-anthropic")]
pub mod anthropic;
#[cfg(feature = "provider-gemini")]
pub mod gemini;
pub mod mock;
#[cfg(feature = "provider-openai")]
pub mod openai;

use async_stream::stream;
use futures_util::StreamExt;
use pquote::{QuoteRequest, QuoteResult, assemble_quote, parse_vendor_quote};

use crate::sse::{SseDecoder, SseFrame};
use crate::transport::ByteStream;
use crate::{BoxedEventStream, ProviderError, ProviderId, ProviderOperationHooks, StreamEvent};

/// What one decoded `data:` payload means for the reply stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FrameOutcome {
    Text(String),
    Ignore,
    Done,
    Skip(String),
    Fail(ProviderError),
}

pub(crate) fn validate_quote_request(request: &QuoteRequest) -> Result<(), ProviderError> {
    request
        .validate()
        .map_err(|errors| ProviderError::invalid_request(errors.to_string()))
}

pub(crate) fn validate_chat_message(message: &str) -> Result<(), ProviderError> {
    if message.trim().is_empty() {
        return Err(ProviderError::invalid_request("chat message must not be empty"));
    }
    Ok(())
}

/// Parses vendor quote text and reports any local corrections.
pub(crate) fn finish_quote(
    provider: ProviderId,
    hooks: &dyn ProviderOperationHooks,
    text: &str,
    quantity: u32,
) -> Result<QuoteResult, ProviderError> {
    let raw = parse_vendor_quote(text)?;
    let assembled = assemble_quote(raw, quantity)?;
    for correction in &assembled.corrections {
        hooks.on_quote_corrected(provider, correction);
    }

    Ok(assembled.result)
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Turns a raw SSE body into reply events using a vendor-specific frame decoder.
///
/// Frames that cannot be decoded become [`StreamEvent::ChunkSkipped`]; transport
/// errors end the stream.
pub(crate) fn sse_event_stream<'a>(
    mut chunks: ByteStream<'a>,
    decode: fn(&str) -> FrameOutcome,
) -> BoxedEventStream<'a> {
    let stream = stream! {
        let mut decoder = SseDecoder::new();
        let mut stopped = false;

        'read: while let Some(item) = chunks.next().await {
            let bytes = match item {
                Ok(bytes) => bytes,
                Err(error) => {
                    yield Err::<StreamEvent, ProviderError>(error);
                    return;
                }
            };

            for frame in decoder.push(&bytes) {
                match apply_frame(frame, decode) {
                    FrameStep::Emit(event) => yield Ok(event),
                    FrameStep::Continue => {}
                    FrameStep::Stop => {
                        stopped = true;
                        break 'read;
                    }
                    FrameStep::Fail(error) => {
                        yield Err(error);
                        return;
                    }
                }
            }
        }

        if let Some(frame) = decoder.finish().filter(|_| !stopped) {
            match apply_frame(frame, decode) {
                FrameStep::Emit(event) => yield Ok(event),
                FrameStep::Fail(error) => yield Err(error),
                FrameStep::Continue | FrameStep::Stop => {}
            }
        }
    };

    Box::pin(stream)
}

enum FrameStep {
    Emit(StreamEvent),
    Continue,
    Stop,
    Fail(ProviderError),
}

fn apply_frame(frame: SseFrame, decode: fn(&str) -> FrameOutcome) -> FrameStep {
    let payload = match frame {
        SseFrame::Data(payload) => payload,
        SseFrame::Invalid(reason) => {
            return FrameStep::Emit(StreamEvent::ChunkSkipped { reason });
        }
    };
    if payload.is_empty() {
        return FrameStep::Continue;
    }

    match decode(&payload) {
        FrameOutcome::Text(text) if text.is_empty() => FrameStep::Continue,
        FrameOutcome::Text(text) => FrameStep::Emit(StreamEvent::TextDelta(text)),
        FrameOutcome::Ignore => FrameStep::Continue,
        FrameOutcome::Done => FrameStep::Stop,
        FrameOutcome::Skip(reason) => FrameStep::Emit(StreamEvent::ChunkSkipped { reason }),
        FrameOutcome::Fail(error) => FrameStep::Fail(error),
    }
}
