//! Shared backend traits, chat data structures, and the generation error type.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::secret::ApiKey;

/// Result alias used by backends and the generation client.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors surfaced by a generation call.
///
/// Variants are split so callers can tell "fix your configuration" apart from
/// "transient, try again" and "nothing was produced".
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Credential or option is missing or invalid. No request was sent.
    #[error("generation not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The trip request was rejected before any prompt was rendered.
    #[error("invalid trip request: {reason}")]
    Validation {
        /// Reason the request was rejected.
        reason: String,
    },

    /// The prompt template could not be rendered.
    #[error("prompt rendering failed: {reason}")]
    Template {
        /// Reason rendering failed.
        reason: String,
    },

    /// The backend could not be reached, or the call timed out.
    #[error("backend transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The backend refused the configured credential.
    #[error("backend rejected the API credential ({status}): {detail}")]
    CredentialRejected {
        /// HTTP status returned by the backend.
        status: u16,
        /// Backend-provided detail.
        detail: String,
    },

    /// The backend returned an error status or an unreadable response.
    #[error("backend error{}: {detail}", status_suffix(.status))]
    Backend {
        /// HTTP status, when the failure came with one.
        status: Option<u16>,
        /// Backend-provided detail or decode failure.
        detail: String,
    },

    /// The call succeeded but produced no usable text.
    #[error("backend returned no itinerary text")]
    EmptyResult,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" ({code})")).unwrap_or_default()
}

/// Coarse classification of a [`GenerationError`] for callers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// The caller must fix configuration or input before retrying.
    FixConfiguration,
    /// A later attempt may succeed unchanged.
    Transient,
    /// The backend answered but produced nothing.
    NoContent,
}

impl GenerationError {
    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for backend failures.
    #[must_use]
    pub fn backend(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Backend {
            status,
            detail: detail.into(),
        }
    }

    /// Classifies the error for caller-side handling.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Configuration { .. }
            | Self::Validation { .. }
            | Self::Template { .. }
            | Self::CredentialRejected { .. } => ErrorClass::FixConfiguration,
            Self::Transport { .. } => ErrorClass::Transient,
            Self::Backend { status, .. } => match status {
                Some(code) if *code == 429 || *code >= 500 => ErrorClass::Transient,
                Some(_) => ErrorClass::FixConfiguration,
                None => ErrorClass::Transient,
            },
            Self::EmptyResult => ErrorClass::NoContent,
        }
    }
}

impl From<trip_primitives::Error> for GenerationError {
    fn from(err: trip_primitives::Error) -> Self {
        Self::Validation {
            reason: err.to_string(),
        }
    }
}

impl From<trip_prompts::TemplateError> for GenerationError {
    fn from(err: trip_prompts::TemplateError) -> Self {
        Self::Template {
            reason: err.to_string(),
        }
    }
}

/// Describes a backend instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendMetadata {
    provider: &'static str,
    endpoint: String,
}

impl BackendMetadata {
    /// Creates metadata for the supplied provider and endpoint.
    #[must_use]
    pub fn new(provider: &'static str, endpoint: impl Into<String>) -> Self {
        Self {
            provider,
            endpoint: endpoint.into(),
        }
    }

    /// Returns the provider identifier (e.g. "groq").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Roles used in the two-turn conversation.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Steers the assistant behaviour.
    System,
    /// The human turn.
    User,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
        })
    }
}

/// One turn of a chat conversation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    role: MessageRole,
    content: String,
}

impl ChatMessage {
    /// Creates a new message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A single chat completion request handed to a [`ChatBackend`].
#[derive(Clone, Debug)]
pub struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
    api_key: ApiKey,
}

impl ChatRequest {
    /// Assembles a request. The generation client is the usual caller.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        temperature: f32,
        messages: Vec<ChatMessage>,
        api_key: ApiKey,
    ) -> Self {
        Self {
            model: model.into(),
            temperature,
            messages,
            api_key,
        }
    }

    /// Model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Conversation turns in order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Credential to authenticate with.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}

/// A text-generation backend exposing a chat-style completion call.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns metadata describing the backend.
    fn metadata(&self) -> &BackendMetadata;

    /// Performs exactly one completion call and returns the generated text.
    async fn complete(&self, request: ChatRequest) -> GenerationResult<String>;
}
