//! Single-shot generation client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};
use trip_prompts::RenderedPayload;

use crate::secret::ApiKey;
use crate::traits::{
    BackendMetadata, ChatBackend, ChatMessage, ChatRequest, GenerationError, GenerationResult,
    MessageRole,
};

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default bound on one outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-call generation options.
///
/// A missing key is representable so that the failure is reported by
/// [`GenerationClient::invoke`] before anything is sent.
#[derive(Clone)]
pub struct GenerationOptions {
    model: String,
    temperature: f32,
    api_key: Option<ApiKey>,
    timeout: Duration,
}

impl GenerationOptions {
    /// Creates options for the supplied model with default temperature and
    /// timeout, and no credential.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the sampling temperature. Checked against `[0, 1]` on invoke.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Supplies the credential.
    #[must_use]
    pub fn with_api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Bounds the outbound call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
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

    /// Whether a credential is present.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Outbound call bound.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn checked_key(&self) -> GenerationResult<&ApiKey> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| GenerationError::configuration("no API credential configured"))?;

        if self.model.trim().is_empty() {
            return Err(GenerationError::configuration("model identifier is empty"));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(GenerationError::configuration(format!(
                "temperature must be within [0, 1], got {}",
                self.temperature
            )));
        }
        if self.timeout.is_zero() {
            return Err(GenerationError::configuration("timeout must be non-zero"));
        }
        Ok(key)
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl fmt::Debug for GenerationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationOptions")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sends a rendered payload to a backend as a two-turn conversation.
///
/// Holds no state across calls, so one client may serve concurrent callers.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn ChatBackend>,
}

impl fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationClient")
            .field("backend", self.backend.metadata())
            .finish()
    }
}

impl GenerationClient {
    /// Wraps the supplied backend.
    #[must_use]
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Returns metadata for the wrapped backend.
    #[must_use]
    pub fn backend_metadata(&self) -> &BackendMetadata {
        self.backend.metadata()
    }

    /// Performs one completion call and returns the text verbatim.
    ///
    /// Options are checked first; on failure nothing is sent. The call is
    /// never retried.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Configuration`] for a missing credential or an
    ///   invalid option.
    /// - [`GenerationError::Transport`] when the backend is unreachable or the
    ///   timeout elapses.
    /// - [`GenerationError::CredentialRejected`] or
    ///   [`GenerationError::Backend`] when the backend refuses the request.
    /// - [`GenerationError::EmptyResult`] when the response has no text.
    pub async fn invoke(
        &self,
        payload: RenderedPayload,
        options: &GenerationOptions,
    ) -> GenerationResult<String> {
        let api_key = options.checked_key()?.clone();
        let provider = self.backend.metadata().provider();

        let (system_text, human_text) = payload.into_parts();
        let request = ChatRequest::new(
            options.model(),
            options.temperature(),
            vec![
                ChatMessage::new(MessageRole::System, system_text),
                ChatMessage::new(MessageRole::User, human_text),
            ],
            api_key,
        );

        debug!(provider, model = options.model(), "awaiting backend response");
        let text = timeout(options.timeout(), self.backend.complete(request))
            .await
            .map_err(|_| {
                warn!(provider, timeout = ?options.timeout(), "backend call timed out");
                GenerationError::transport(format!(
                    "{provider} did not respond within {:?}",
                    options.timeout()
                ))
            })??;

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResult);
        }

        info!(provider, chars = text.len(), "backend response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct ScriptedBackend {
        metadata: BackendMetadata,
        calls: AtomicUsize,
        seen: Mutex<Vec<ChatRequest>>,
        reply: fn() -> GenerationResult<String>,
        delay: Option<Duration>,
    }

    impl ScriptedBackend {
        fn new(reply: fn() -> GenerationResult<String>) -> Self {
            Self {
                metadata: BackendMetadata::new("scripted", "memory://scripted"),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                reply,
                delay: None,
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        fn metadata(&self) -> &BackendMetadata {
            &self.metadata
        }

        async fn complete(&self, request: ChatRequest) -> GenerationResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.reply)()
        }
    }

    fn payload() -> RenderedPayload {
        RenderedPayload::new("system text", "Please generate the itinerary.")
    }

    fn options() -> GenerationOptions {
        GenerationOptions::default().with_api_key(ApiKey::new("test_key").unwrap())
    }

    #[tokio::test]
    async fn returns_text_verbatim() {
        let backend = Arc::new(ScriptedBackend::new(|| Ok("  ## Morning\n- Castle\n".to_owned())));
        let client = GenerationClient::new(backend.clone());

        let text = client.invoke(payload(), &options()).await.unwrap();
        assert_eq!(text, "  ## Morning\n- Castle\n");

        let seen = backend.seen.lock().unwrap();
        let messages = seen[0].messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), MessageRole::System);
        assert_eq!(messages[0].content(), "system text");
        assert_eq!(messages[1].role(), MessageRole::User);
        assert_eq!(seen[0].model(), DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn missing_key_sends_nothing() {
        let backend = Arc::new(ScriptedBackend::new(|| Ok("unused".to_owned())));
        let client = GenerationClient::new(backend.clone());

        let err = client
            .invoke(payload(), &GenerationOptions::default())
            .await
            .expect_err("no key");
        assert!(matches!(err, GenerationError::Configuration { .. }));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn out_of_range_temperature_sends_nothing() {
        let backend = Arc::new(ScriptedBackend::new(|| Ok("unused".to_owned())));
        let client = GenerationClient::new(backend.clone());

        let err = client
            .invoke(payload(), &options().with_temperature(1.5))
            .await
            .expect_err("bad temperature");
        assert!(matches!(err, GenerationError::Configuration { .. }));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_not_retried() {
        let backend = Arc::new(ScriptedBackend::new(|| {
            Err(GenerationError::transport("connection refused"))
        }));
        let client = GenerationClient::new(backend.clone());

        let err = client.invoke(payload(), &options()).await.expect_err("transport");
        assert!(matches!(err, GenerationError::Transport { .. }));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_text_is_empty_result() {
        let backend = Arc::new(ScriptedBackend::new(|| Ok(" \n\t".to_owned())));
        let client = GenerationClient::new(backend);

        let err = client.invoke(payload(), &options()).await.expect_err("empty");
        assert!(matches!(err, GenerationError::EmptyResult));
    }

    #[tokio::test]
    async fn backend_errors_pass_through() {
        let backend = Arc::new(ScriptedBackend::new(|| {
            Err(GenerationError::CredentialRejected {
                status: 401,
                detail: "Invalid API Key".to_owned(),
            })
        }));
        let client = GenerationClient::new(backend);

        let err = client.invoke(payload(), &options()).await.expect_err("rejected");
        assert!(matches!(err, GenerationError::CredentialRejected { status: 401, .. }));
    }

    // Timeout handling lives in this client rather than the backend contract.
    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let backend = Arc::new(
            ScriptedBackend::new(|| Ok("late".to_owned())).delayed(Duration::from_secs(120)),
        );
        let client = GenerationClient::new(backend.clone());

        let err = client
            .invoke(payload(), &options().with_timeout(Duration::from_secs(5)))
            .await
            .expect_err("timeout");
        assert!(matches!(err, GenerationError::Transport { .. }));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_output_hides_key() {
        let printed = format!("{:?}", options());
        assert!(!printed.contains("test_key"));
    }
}
