//! Backend for services speaking the `OpenAI` chat-completions protocol.
//!
//! Groq, `OpenAI`, and Ollama's compatibility endpoint all accept the same
//! request shape, so one backend covers them; only the base URL differs.

use std::fmt;

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Request, StatusCode, Uri};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::http_client::{HyperClient, build_https_client};
use crate::traits::{
    BackendMetadata, ChatBackend, ChatMessage, ChatRequest, GenerationError, GenerationResult,
};

/// Base URL of Groq's OpenAI-compatible API.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/";

/// Base URL of the official `OpenAI` API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/";

/// Configuration for [`OpenAiCompatibleBackend`].
#[derive(Clone, Debug)]
pub struct OpenAiCompatibleConfig {
    provider: &'static str,
    base_url: String,
}

impl OpenAiCompatibleConfig {
    /// Targets Groq.
    #[must_use]
    pub fn groq() -> Self {
        Self {
            provider: "groq",
            base_url: GROQ_BASE_URL.to_owned(),
        }
    }

    /// Targets the official `OpenAI` API.
    #[must_use]
    pub fn openai() -> Self {
        Self {
            provider: "openai",
            base_url: OPENAI_BASE_URL.to_owned(),
        }
    }

    /// Targets an arbitrary compatible service.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] if the URL is invalid.
    pub fn custom(provider: &'static str, base_url: impl AsRef<str>) -> GenerationResult<Self> {
        Ok(Self {
            provider,
            base_url: sanitize_base_url(base_url.as_ref())?,
        })
    }

    /// Overrides the base URL, keeping the provider name.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] if the URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> GenerationResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Returns the configured base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self::groq()
    }
}

/// Chat-completions backend calling the service over HTTPS.
pub struct OpenAiCompatibleBackend {
    client: HyperClient,
    endpoint: Uri,
    metadata: BackendMetadata,
}

impl fmt::Debug for OpenAiCompatibleBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleBackend")
            .field("provider", &self.metadata.provider())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleBackend {
    /// Constructs a backend for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] if the endpoint is invalid.
    pub fn new(config: OpenAiCompatibleConfig) -> GenerationResult<Self> {
        let endpoint_text = format!("{}v1/chat/completions", config.base_url);
        let endpoint = endpoint_text.parse::<Uri>().map_err(|err| {
            GenerationError::configuration(format!("invalid chat endpoint: {err}"))
        })?;

        Ok(Self {
            client: build_https_client(),
            endpoint,
            metadata: BackendMetadata::new(config.provider, endpoint_text),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatibleBackend {
    fn metadata(&self) -> &BackendMetadata {
        &self.metadata
    }

    async fn complete(&self, request: ChatRequest) -> GenerationResult<String> {
        let payload = build_request(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            GenerationError::configuration(format!("failed to encode chat request: {err}"))
        })?;

        let http_request = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(
                AUTHORIZATION,
                format!("Bearer {}", request.api_key().expose()),
            )
            .body(Body::from(body))
            .map_err(|err| {
                GenerationError::configuration(format!("failed to build chat request: {err}"))
            })?;

        let response = self.client.request(http_request).await.map_err(|err| {
            GenerationError::transport(format!("{} request failed: {err}", self.metadata.provider()))
        })?;

        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.map_err(|err| {
            GenerationError::transport(format!(
                "failed to read {} response: {err}",
                self.metadata.provider()
            ))
        })?;

        interpret_response(status, &bytes).inspect_err(|err| {
            warn!(provider = self.metadata.provider(), %status, error = %err, "chat completion failed");
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn build_request(request: &ChatRequest) -> ChatCompletionRequest<'_> {
    ChatCompletionRequest {
        model: request.model(),
        messages: request.messages().iter().map(map_message).collect(),
        temperature: request.temperature(),
        stream: false,
    }
}

fn map_message(message: &ChatMessage) -> WireMessage<'_> {
    WireMessage {
        role: message.role().to_string(),
        content: message.content(),
    }
}

/// Maps a status and body to the generated text or a typed error.
///
/// A successful response without any choice content yields an empty string;
/// the generation client decides what "empty" means.
fn interpret_response(status: StatusCode, bytes: &[u8]) -> GenerationResult<String> {
    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorEnvelope>(bytes).map_or_else(
            |_| String::from_utf8_lossy(bytes).trim().to_owned(),
            |envelope| envelope.error.message,
        );
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                GenerationError::CredentialRejected {
                    status: status.as_u16(),
                    detail,
                }
            }
            _ => GenerationError::backend(Some(status.as_u16()), detail),
        });
    }

    let response: ChatCompletionResponse = serde_json::from_slice(bytes).map_err(|err| {
        GenerationError::backend(None, format!("failed to decode chat response: {err}"))
    })?;

    Ok(response
        .choices
        .into_iter()
        .find_map(|choice| choice.message.and_then(|message| message.content))
        .unwrap_or_default())
}

fn sanitize_base_url(input: &str) -> GenerationResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(GenerationError::configuration(
            "backend base URL must start with http:// or https://",
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|err| GenerationError::configuration(format!("invalid backend base URL: {err}")))?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::ApiKey;
    use crate::traits::MessageRole;

    fn chat_request() -> ChatRequest {
        ChatRequest::new(
            "llama-3.3-70b-versatile",
            0.3,
            vec![
                ChatMessage::new(MessageRole::System, "system text"),
                ChatMessage::new(MessageRole::User, "Please generate the itinerary."),
            ],
            ApiKey::new("test_key").unwrap(),
        )
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = OpenAiCompatibleConfig::groq()
            .with_base_url("api.groq.com")
            .expect_err("missing scheme should error");
        assert!(matches!(err, GenerationError::Configuration { .. }));
    }

    #[test]
    fn sanitize_appends_trailing_slash() {
        let cfg = OpenAiCompatibleConfig::custom("local", "http://localhost:11434").unwrap();
        assert_eq!(cfg.base_url(), "http://localhost:11434/");
    }

    #[test]
    fn groq_endpoint() {
        let backend = OpenAiCompatibleBackend::new(OpenAiCompatibleConfig::groq()).unwrap();
        assert_eq!(backend.metadata().provider(), "groq");
        assert_eq!(
            backend.metadata().endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn request_body_carries_two_turns_and_no_key() {
        let request = chat_request();
        let json = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "system text");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(!json.to_string().contains("test_key"));
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = br#"{"choices":[{"message":{"content":"Morning: visit castle"}}]}"#;
        let text = interpret_response(StatusCode::OK, body).unwrap();
        assert_eq!(text, "Morning: visit castle");
    }

    #[test]
    fn missing_choices_yield_empty_text() {
        let text = interpret_response(StatusCode::OK, br#"{"choices":[]}"#).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn malformed_success_body_is_backend_error() {
        let err = interpret_response(StatusCode::OK, b"<html>").expect_err("bad body");
        assert!(matches!(err, GenerationError::Backend { status: None, .. }));
    }

    #[test]
    fn unauthorized_is_credential_rejected() {
        let body = br#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        let err = interpret_response(StatusCode::UNAUTHORIZED, body).expect_err("401");
        match err {
            GenerationError::CredentialRejected { status, detail } => {
                assert_eq!(status, 401);
                assert_eq!(detail, "Invalid API Key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_status_keeps_backend_detail() {
        let body = br#"{"error":{"message":"The model `nope` does not exist"}}"#;
        let err = interpret_response(StatusCode::NOT_FOUND, body).expect_err("404");
        assert!(matches!(
            err,
            GenerationError::Backend { status: Some(404), ref detail } if detail.contains("nope")
        ));

        let err = interpret_response(StatusCode::TOO_MANY_REQUESTS, b"slow down").expect_err("429");
        assert!(matches!(
            err,
            GenerationError::Backend { status: Some(429), ref detail } if detail == "slow down"
        ));
    }
}
