//! Vendor-neutral HTTP transport trait and the reqwest implementation.
//!
//! Adapters build the vendor envelope as JSON and hand it to a transport
//! together with the authentication to apply. Tests swap in fakes that
//! capture requests and replay canned bodies.

use std::pin::Pin;
use std::time::Duration;

use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::{ProviderError, ProviderFuture};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ProviderError>> + Send + 'a>>;

#[derive(Clone, PartialEq, Eq)]
pub enum VendorAuth {
    Bearer(String),
    Header { name: &'static str, value: String },
}

impl std::fmt::Debug for VendorAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("VendorAuth::Bearer([REDACTED])"),
            Self::Header { name, .. } => write!(f, "VendorAuth::Header({name}: [REDACTED])"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    /// Sends the request and returns the full success body.
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
        auth: VendorAuth,
    ) -> ProviderFuture<'a, Result<String, ProviderError>>;

    /// Sends the request and returns the success body as raw chunks.
    fn post_stream<'a>(
        &'a self,
        request: HttpRequest,
        auth: VendorAuth,
    ) -> ProviderFuture<'a, Result<ByteStream<'a>, ProviderError>>;
}

/// Calls vendors over reqwest.
///
/// With [`ReqwestTransport::with_timeout`], a JSON call is bounded as a
/// whole while a streamed reply is bounded per read, so a long reply that
/// keeps producing chunks is never cut off.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    request_timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            request_timeout: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .read_timeout(timeout)
            .build()
            .map_err(|err| ProviderError::other(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            request_timeout: Some(timeout),
        })
    }

    fn builder(&self, request: HttpRequest, auth: &VendorAuth, mode: CallMode) -> RequestBuilder {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let (CallMode::Whole, Some(timeout)) = (mode, self.request_timeout) {
            builder = builder.timeout(timeout);
        }

        match auth {
            VendorAuth::Bearer(token) => builder.bearer_auth(token),
            VendorAuth::Header { name, value } => builder.header(*name, value),
        }
    }

    async fn send(
        &self,
        request: HttpRequest,
        auth: &VendorAuth,
        mode: CallMode,
    ) -> Result<Response, ProviderError> {
        let response = self
            .builder(request, auth, mode)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        Ok(response)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error_for_status(status, &body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallMode {
    Whole,
    Streaming,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
        auth: VendorAuth,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            let response = self.send(request, &auth, CallMode::Whole).await?;
            response.text().await.map_err(map_reqwest_error)
        })
    }

    fn post_stream<'a>(
        &'a self,
        request: HttpRequest,
        auth: VendorAuth,
    ) -> ProviderFuture<'a, Result<ByteStream<'a>, ProviderError>> {
        Box::pin(async move {
            let response = self.send(request, &auth, CallMode::Streaming).await?;
            let chunks = response.bytes_stream().map(|item| {
                item.map(|bytes| bytes.to_vec())
                    .map_err(map_reqwest_error)
            });

            Ok(Box::pin(chunks) as ByteStream<'a>)
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extracts `error.message`, the shape all three vendors use for failures.
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}

pub fn error_for_status(status: StatusCode, body: &str) -> ProviderError {
    let message = extract_error_message(body)
        .unwrap_or_else(|| format!("request failed with status {status}"));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::authentication(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::timeout(message)
        }
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::invalid_request(message)
        }
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
            ProviderError::unavailable(message)
        }
        // Anthropic's overloaded status.
        status if status.as_u16() == 529 => ProviderError::unavailable(message),
        _ => ProviderError::transport(message),
    }
}
