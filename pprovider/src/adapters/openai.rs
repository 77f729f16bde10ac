//! OpenAI chat-completions adapter.

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
use crate::sse::DONE_SENTINEL;
use crate::transport::{HttpRequest, HttpTransport, VendorAuth};
use crate::{
    BoxedEventStream, Message, ProviderError, ProviderFuture, ProviderId, ProviderOperationHooks,
    QuoteProvider, Role, SecureCredentialManager,
};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
pub struct OpenAiProvider {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            hooks: noop_hooks(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: ProviderId::OpenAi.default_model().to_string(),
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

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    fn auth(&self) -> Result<VendorAuth, ProviderError> {
        Ok(VendorAuth::Bearer(
            self.credentials.require_api_key(ProviderId::OpenAi)?,
        ))
    }

    pub(crate) fn build_quote_request(&self, request: &QuoteRequest) -> HttpRequest {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": JSON_ONLY_SYSTEM_PROMPT },
                { "role": "user", "content": quote_prompt(request) },
            ],
            "response_format": { "type": "json_object" },
        });

        HttpRequest::post(endpoint(&self.base_url, "chat/completions"), body)
    }

    pub(crate) fn build_chat_request(&self, history: &[Message], message: &str) -> HttpRequest {
        let mut messages = vec![json!({ "role": "system", "content": CHAT_SYSTEM_PROMPT })];
        messages.extend(history.iter().map(|entry| {
            json!({ "role": role_name(entry.role), "content": entry.content })
        }));
        messages.push(json!({ "role": "user", "content": message }));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": true,
        });

        HttpRequest::post(endpoint(&self.base_url, "chat/completions"), body)
    }
}

impl QuoteProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn generate_structured_quote<'a>(
        &'a self,
        request: &'a QuoteRequest,
    ) -> ProviderFuture<'a, Result<QuoteResult, ProviderError>> {
        Box::pin(observe_call(
            self.hooks.as_ref(),
            ProviderId::OpenAi,
            OPERATION_QUOTE,
            async move {
                validate_quote_request(request)?;
                let auth = self.auth()?;
                let body = self
                    .transport
                    .post_json(self.build_quote_request(request), auth)
                    .await?;

                let response: CompletionResponse = serde_json::from_str(&body)
                    .map_err(|err| ProviderError::malformed_response(err.to_string()))?;
                let content = response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or_else(|| {
                        ProviderError::malformed_response("OpenAI response contained no message")
                    })?;

                finish_quote(
                    ProviderId::OpenAi,
                    self.hooks.as_ref(),
                    &content,
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
            self.hooks.on_request_start(ProviderId::OpenAi, OPERATION_CHAT);
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
                    ProviderId::OpenAi,
                    started,
                    sse_event_stream(chunks, decode_frame),
                )),
                Err(error) => {
                    self.hooks
                        .on_failure(ProviderId::OpenAi, OPERATION_CHAT, started.elapsed(), &error);
                    Err(error)
                }
            }
        })
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<StreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

fn decode_frame(payload: &str) -> FrameOutcome {
    if payload == DONE_SENTINEL {
        return FrameOutcome::Done;
    }

    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(StreamChunk {
            error: Some(error), ..
        }) => FrameOutcome::Fail(ProviderError::unavailable(
            error
                .message
                .unwrap_or_else(|| "OpenAI stream reported an error".to_string()),
        )),
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .map(FrameOutcome::Text)
            .unwrap_or(FrameOutcome::Ignore),
        Err(err) => FrameOutcome::Skip(err.to_string()),
    }
}
