//! Itinerary prompt rendering.
//!
//! One renderer, parameterised by [`TemplateVariant`], turns a validated
//! [`trip_primitives::TripRequest`] into a [`RenderedPayload`].

#![warn(missing_docs, clippy::pedantic)]

pub mod renderer;
pub mod template;
pub mod variant;

pub use renderer::{RenderedPayload, render};
pub use template::{PromptTemplate, TemplateError, TemplateResult};
pub use variant::{TemplateVariant, UnknownVariant};
