//! Anthropic messages API adapter.
//!
//! The messages API has no JSON mode, so quote output is coaxed through the
//! system prompt and may arrive wrapped in a code fence.

use std::sync::Arc;
use std::time::Instant;

use pquote::{CHAT_SYSTEM_PROMPT, JSON_ONLY_SYSTEM_PROMPT, QuoteRequest, QuoteResult, quote_prompt};
use serde::Deserialize;
use serde_json::json;

use crate::adapters::{
    FrameOutcome, endpoint, finish_quote, sse_event_stream, validate_chat_message,
    validate_quote_request,
};
use crate::hooks::{OPERATION_CHAT, OPERATION_QUOTE, noop_hooks, observe_call, observe_stream};
use crate::transport::{HttpRequest, HttpTransport, VendorAuth};
use crate::{
    BoxedEventStream, Message, ProviderError, ProviderFuture, ProviderId, ProviderOperationHooks,
    QuoteProvider, Role, SecureCredentialManager,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Clone)]
pub struct AnthropicProvider {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            hooks: noop_hooks(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            model: ProviderId::Anthropic.default_model().to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_options(mut self, options: pcommon::GenerationOptions) -> Self {
        self.max_tokens = options.max_tokens_or(DEFAULT_MAX_TOKENS);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    fn auth(&self) -> Result<VendorAuth, ProviderError> {
        Ok(VendorAuth::Header {
            name: "x-api-key",
            value: self.credentials.require_api_key(ProviderId::Anthropic)?,
        })
    }

    fn messages_request(&self, body: serde_json::Value) -> HttpRequest {
        HttpRequest::post(endpoint(&self.base_url, "messages"), body)
            .with_header("anthropic-version", ANTHROPIC_VERSION)
    }

    pub(crate) fn build_quote_request(&self, request: &QuoteRequest) -> HttpRequest {
        self.messages_request(json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": JSON_ONLY_SYSTEM_PROMPT,
            "messages": [{ "role": "user", "content": quote_prompt(request) }],
        }))
    }

    pub(crate) fn build_chat_request(&self, history: &[Message], message: &str) -> HttpRequest {
        let mut messages = history
            .iter()
            .filter_map(|entry| {
                let role = match entry.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::System => return None,
                };
                Some(json!({ "role": role, "content": entry.content }))
            })
            .collect::<Vec<_>>();
        messages.push(json!({ "role": "user", "content": message }));

        self.messages_request(json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "stream": true,
            "system": CHAT_SYSTEM_PROMPT,
            "messages": messages,
        }))
    }
}

impl QuoteProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn generate_structured_quote<'a>(
        &'a self,
        request: &'a QuoteRequest,
    ) -> ProviderFuture<'a, Result<QuoteResult, ProviderError>> {
        Box::pin(observe_call(
            self.hooks.as_ref(),
            ProviderId::Anthropic,
            OPERATION_QUOTE,
            async move {
                validate_quote_request(request)?;
                let auth = self.auth()?;
                let body = self
                    .transport
                    .post_json(self.build_quote_request(request), auth)
                    .await?;

                let response: MessagesResponse = serde_json::from_str(&body)
                    .map_err(|err| ProviderError::malformed_response(err.to_string()))?;
                let text = response
                    .content
                    .into_iter()
                    .find_map(|block| block.text)
                    .ok_or_else(|| {
                        ProviderError::malformed_response("Anthropic response contained no text")
                    })?;

                finish_quote(
                    ProviderId::Anthropic,
                    self.hooks.as_ref(),
                    &text,
                    request.recipient_count,
                )
            },
        ))
    }

    fn stream_chat_reply<'a>(
        &'a self,
        history: Vec<Message>,
        message: String,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks
                .on_request_start(ProviderId::Anthropic, OPERATION_CHAT);
            let opened = async {
                validate_chat_message(&message)?;
                let auth = self.auth()?;
                self.transport
                    .post_stream(self.build_chat_request(&history, &message), auth)
                    .await
            }
            .await;

            match opened {
                Ok(chunks) => Ok(observe_stream(
                    self.hooks.clone(),
                    ProviderId::Anthropic,
                    started,
                    sse_event_stream(chunks, decode_frame),
                )),
                Err(error) => {
                    self.hooks.on_failure(
                        ProviderId::Anthropic,
                        OPERATION_CHAT,
                        started.elapsed(),
                        &error,
                    );
                    Err(error)
                }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamEnvelope {
    #[serde(rename = "type")]
    kind: String,
    delta: Option<StreamDelta>,
    error: Option<StreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    message: Option<String>,
}

fn decode_frame(payload: &str) -> FrameOutcome {
    let envelope = match serde_json::from_str::<StreamEnvelope>(payload) {
        Ok(envelope) => envelope,
        Err(err) => return FrameOutcome::Skip(err.to_string()),
    };

    match envelope.kind.as_str() {
        "content_block_delta" => envelope
            .delta
            .and_then(|delta| delta.text)
            .map(FrameOutcome::Text)
            .unwrap_or(FrameOutcome::Ignore),
        "message_stop" => FrameOutcome::Done,
        "error" => FrameOutcome::Fail(ProviderError::unavailable(
            envelope
                .error
                .and_then(|error| error.message)
                .unwrap_or_else(|| "Anthropic stream reported an error".to_string()),
        )),
        _ => FrameOutcome::Ignore,
    }
}
