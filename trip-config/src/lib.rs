//! Startup configuration for the trip planner.
//!
//! Configuration is read once, validated, and then passed explicitly to the
//! components that need it. [`PlannerConfig::from_lookup`] takes any variable
//! source, so tests never touch the process environment.

#![warn(missing_docs, clippy::pedantic)]

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};
use trip_adapters::client::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
use trip_adapters::openai::{GROQ_BASE_URL, OpenAiCompatibleConfig};
use trip_adapters::{ApiKey, GenerationError, GenerationOptions};
use trip_prompts::TemplateVariant;

/// Backend credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
/// Model identifier override.
pub const MODEL_ENV: &str = "TRIP_PLANNER_MODEL";
/// Sampling temperature override.
pub const TEMPERATURE_ENV: &str = "TRIP_PLANNER_TEMPERATURE";
/// Backend base URL override.
pub const BASE_URL_ENV: &str = "TRIP_PLANNER_BASE_URL";
/// Outbound call timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "TRIP_PLANNER_TIMEOUT_SECS";
/// Default template variant.
pub const VARIANT_ENV: &str = "TRIP_PLANNER_VARIANT";

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backend credential is not set.
    #[error("no API credential configured: set {var}")]
    MissingCredential {
        /// Variable that should hold the credential.
        var: &'static str,
    },

    /// A variable was set to an unusable value.
    #[error("invalid value for {var}: {reason}")]
    Invalid {
        /// Offending variable.
        var: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl fmt::Display) -> Self {
        Self::Invalid {
            var,
            reason: reason.to_string(),
        }
    }
}

impl From<ConfigError> for GenerationError {
    fn from(err: ConfigError) -> Self {
        GenerationError::configuration(err.to_string())
    }
}

/// Validated, immutable planner configuration.
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    api_key: ApiKey,
    model: String,
    temperature: f32,
    timeout: Duration,
    backend: OpenAiCompatibleConfig,
    variant: TemplateVariant,
}

impl PlannerConfig {
    /// Loads `.env` when present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when [`API_KEY_ENV`] is unset
    /// and [`ConfigError::Invalid`] for malformed values.
    pub fn from_env() -> ConfigResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env file"),
            Err(err) if err.not_found() => {}
            Err(err) => return Err(ConfigError::invalid(".env", err)),
        }
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when [`API_KEY_ENV`] is unset
    /// and [`ConfigError::Invalid`] for malformed values.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let api_key = get(API_KEY_ENV)
            .ok_or(ConfigError::MissingCredential { var: API_KEY_ENV })
            .and_then(|raw| {
                ApiKey::new(raw).map_err(|err| ConfigError::invalid(API_KEY_ENV, err))
            })?;

        let model = get(MODEL_ENV).map_or_else(|| DEFAULT_MODEL.to_owned(), |m| m.trim().to_owned());

        let temperature = match get(TEMPERATURE_ENV) {
            Some(raw) => parse_temperature(&raw)?,
            None => DEFAULT_TEMPERATURE,
        };

        let timeout = match get(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        let base_url = get(BASE_URL_ENV).unwrap_or_else(|| GROQ_BASE_URL.to_owned());
        let backend = OpenAiCompatibleConfig::groq()
            .with_base_url(&base_url)
            .map_err(|err| ConfigError::invalid(BASE_URL_ENV, err))?;

        let variant = match get(VARIANT_ENV) {
            Some(raw) => raw
                .parse::<TemplateVariant>()
                .map_err(|err| ConfigError::invalid(VARIANT_ENV, err))?,
            None => TemplateVariant::default(),
        };

        info!(
            model = %model,
            temperature,
            timeout_secs = timeout.as_secs(),
            base_url = backend.base_url(),
            variant = %variant,
            "planner configuration loaded"
        );

        Ok(Self {
            api_key,
            model,
            temperature,
            timeout,
            backend,
            variant,
        })
    }

    /// Replaces the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replaces the sampling temperature.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the value is outside `[0, 1]`.
    pub fn with_temperature(mut self, temperature: f32) -> ConfigResult<Self> {
        self.temperature = check_temperature(TEMPERATURE_ENV, temperature)?;
        Ok(self)
    }

    /// Replaces the default template variant.
    #[must_use]
    pub fn with_variant(mut self, variant: TemplateVariant) -> Self {
        self.variant = variant;
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

    /// Outbound call bound.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Backend endpoint configuration.
    #[must_use]
    pub fn backend(&self) -> &OpenAiCompatibleConfig {
        &self.backend
    }

    /// Default template variant.
    #[must_use]
    pub const fn variant(&self) -> TemplateVariant {
        self.variant
    }

    /// Generation options derived from this configuration.
    #[must_use]
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions::new(self.model.clone())
            .with_temperature(self.temperature)
            .with_timeout(self.timeout)
            .with_api_key(self.api_key.clone())
    }
}

fn parse_temperature(raw: &str) -> ConfigResult<f32> {
    let value = raw
        .trim()
        .parse::<f32>()
        .map_err(|err| ConfigError::invalid(TEMPERATURE_ENV, err))?;
    check_temperature(TEMPERATURE_ENV, value)
}

fn check_temperature(var: &'static str, value: f32) -> ConfigResult<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::invalid(var, format!("{value} is outside [0, 1]")))
    }
}

fn parse_timeout(raw: &str) -> ConfigResult<Duration> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|err| ConfigError::invalid(TIMEOUT_ENV, err))?;
    if secs == 0 {
        return Err(ConfigError::invalid(TIMEOUT_ENV, "timeout must be at least one second"));
    }
    Ok(Duration::from_secs(secs))
}
