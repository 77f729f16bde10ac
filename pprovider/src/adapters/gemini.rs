//! Google Gemini adapter over the `generativelanguage` REST API.
//!
//! Quotes use schema-constrained JSON generation; chat replies stream from
//! `:streamGenerateContent?alt=sse`, where every frame is a partial
//! `GenerateContentResponse` and the body closing ends the reply.

use std::sync::Arc;
use std::time::Instant;

use pquote::{CHAT_SYSTEM_PROMPT, QuoteRequest, QuoteResult, quote_prompt};
use serde::Deserialize;
use serde_json::{Value, json};

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

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            hooks: noop_hooks(),
            base_url: GEMINI_BASE_URL.to_string(),
            model: ProviderId::Gemini.default_model().to_string(),
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
        Ok(VendorAuth::Header {
            name: API_KEY_HEADER,
            value: self.credentials.require_api_key(ProviderId::Gemini)?,
        })
    }

    pub(crate) fn build_quote_request(&self, request: &QuoteRequest) -> HttpRequest {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": quote_prompt(request) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": quote_response_schema(),
            },
        });

        HttpRequest::post(
            endpoint(&self.base_url, &format!("models/{}:generateContent", self.model)),
            body,
        )
    }

    pub(crate) fn build_chat_request(&self, history: &[Message], message: &str) -> HttpRequest {
        let mut contents = history
            .iter()
            .filter_map(|entry| {
                let role = match entry.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                    Role::System => return None,
                };
                Some(json!({ "role": role, "parts": [{ "text": entry.content }] }))
            })
            .collect::<Vec<_>>();
        contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));

        let body = json!({
            "systemInstruction": { "parts": [{ "text": CHAT_SYSTEM_PROMPT }] },
            "contents": contents,
        });

        HttpRequest::post(
            endpoint(
                &self.base_url,
                &format!("models/{}:streamGenerateContent?alt=sse", self.model),
            ),
            body,
        )
    }
}

impl QuoteProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn generate_structured_quote<'a>(
        &'a self,
        request: &'a QuoteRequest,
    ) -> ProviderFuture<'a, Result<QuoteResult, ProviderError>> {
        Box::pin(observe_call(
            self.hooks.as_ref(),
            ProviderId::Gemini,
            OPERATION_QUOTE,
            async move {
                validate_quote_request(request)?;
                let auth = self.auth()?;
                let body = self
                    .transport
                    .post_json(self.build_quote_request(request), auth)
                    .await?;

                let response: GenerateContentResponse = serde_json::from_str(&body)
                    .map_err(|err| ProviderError::malformed_response(err.to_string()))?;
                let text = response.text().ok_or_else(|| {
                    ProviderError::malformed_response("Gemini response contained no text")
                })?;

                finish_quote(
                    ProviderId::Gemini,
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
            self.hooks.on_request_start(ProviderId::Gemini, OPERATION_CHAT);
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
                    ProviderId::Gemini,
                    started,
                    sse_event_stream(chunks, decode_frame),
                )),
                Err(error) => {
                    self.hooks
                        .on_failure(ProviderId::Gemini, OPERATION_CHAT, started.elapsed(), &error);
                    Err(error)
                }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<String>();

        (!text.is_empty()).then_some(text)
    }
}

fn decode_frame(payload: &str) -> FrameOutcome {
    match serde_json::from_str::<GenerateContentResponse>(payload) {
        Ok(response) => response
            .text()
            .map(FrameOutcome::Text)
            .unwrap_or(FrameOutcome::Ignore),
        Err(err) => FrameOutcome::Skip(err.to_string()),
    }
}

fn quote_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "quoteNumber": { "type": "STRING" },
            "products": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "price": { "type": "NUMBER" },
                        "reason": { "type": "STRING" },
                    },
                    "required": ["name", "description", "price", "reason"],
                },
            },
            "subtotal": { "type": "NUMBER" },
            "setupFees": { "type": "NUMBER" },
            "shipping": { "type": "NUMBER" },
            "total": { "type": "NUMBER" },
        },
        "required": ["quoteNumber", "products", "subtotal", "setupFees", "shipping", "total"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_yield_joined_candidate_text() {
        let frame = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi"},{"text":" there"}]}}]}"#;
        assert_eq!(decode_frame(frame), FrameOutcome::Text("Hi there".to_string()));

        let metadata_only = r#"{"usageMetadata":{"promptTokenCount":3}}"#;
        assert_eq!(decode_frame(metadata_only), FrameOutcome::Ignore);

        assert!(matches!(decode_frame("{not json"), FrameOutcome::Skip(_)));
    }

    #[test]
    fn schema_requires_every_summary_field() {
        let schema = quote_response_schema();
        let required = schema["required"].as_array().expect("required list");

        assert_eq!(required.len(), 6);
        assert_eq!(schema["properties"]["products"]["items"]["required"][2], "price");
    }
}
