//! Renders a trip request into a model-ready payload.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;
use trip_primitives::TripRequest;

use crate::template::TemplateResult;
use crate::variant::TemplateVariant;

/// Placeholder filled with the destination city.
pub const CITY_PLACEHOLDER: &str = "city";
/// Placeholder filled with the comma-joined interests.
pub const INTERESTS_PLACEHOLDER: &str = "interests";

/// Fully substituted system and human instructions for one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedPayload {
    system_text: String,
    human_text: String,
}

impl RenderedPayload {
    /// Creates a payload from already rendered instructions.
    #[must_use]
    pub fn new(system_text: impl Into<String>, human_text: impl Into<String>) -> Self {
        Self {
            system_text: system_text.into(),
            human_text: human_text.into(),
        }
    }

    /// System instruction sent as the first turn.
    #[must_use]
    pub fn system_text(&self) -> &str {
        &self.system_text
    }

    /// Human instruction sent as the second turn.
    #[must_use]
    pub fn human_text(&self) -> &str {
        &self.human_text
    }

    /// Splits the payload into `(system_text, human_text)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.system_text, self.human_text)
    }
}

/// Renders `request` with the chosen template variant.
///
/// Pure and deterministic: identical inputs always produce identical
/// payloads. The request type already guarantees a non-empty city and
/// interest list, so the only failure is a template referencing a placeholder
/// other than `{city}` or `{interests}`.
///
/// # Errors
///
/// Returns [`crate::TemplateError::MissingVariable`] if the variant's template
/// references an unknown placeholder.
pub fn render(request: &TripRequest, variant: TemplateVariant) -> TemplateResult<RenderedPayload> {
    let interests = request.joined_interests();
    let vars = HashMap::from([
        (CITY_PLACEHOLDER, request.city()),
        (INTERESTS_PLACEHOLDER, interests.as_str()),
    ]);

    let system_text = variant.system_template().render(&vars)?;
    debug!(
        variant = %variant,
        system_len = system_text.len(),
        interests = request.interests().len(),
        "rendered itinerary prompt"
    );

    Ok(RenderedPayload::new(system_text, variant.human_instruction()))
}
