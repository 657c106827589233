//! Prompt-templated, single-shot itinerary generation.
//!
//! A validated [`TripRequest`] is rendered with one of three
//! [`TemplateVariant`]s and sent once to a chat backend; the generated
//! Markdown comes back verbatim. Optional components sit behind the `config`
//! and `telemetry` features.

#![warn(missing_docs, clippy::pedantic)]

mod planner;

pub use planner::{TripPlanner, plan_itinerary};

/// Re-export shared primitives.
pub use trip_primitives as primitives;
pub use trip_primitives::{Interest, TripRequest};

/// Prompt templates and rendering.
pub use trip_prompts as prompts;
pub use trip_prompts::{RenderedPayload, TemplateVariant, render};

/// Generation client and backends.
pub use trip_adapters as adapters;
pub use trip_adapters::{
    ApiKey, ErrorClass, GenerationClient, GenerationError, GenerationOptions, GenerationResult,
};

/// Startup configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use trip_config as config;

/// Logging setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use trip_telemetry as telemetry;
