//! The itinerary template variants.
//!
//! Variants differ only in how strictly they constrain the output structure.
//! Each system template carries the `{city}` and `{interests}` placeholders;
//! the human turn is fixed text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::template::PromptTemplate;

static FREEFORM_SYSTEM: PromptTemplate = PromptTemplate::from_static(
    "You are a helpful travel assistant. Create a concise 1-day itinerary \
     for {city} based on the user's interests: {interests}. \
     Respond in clear Markdown with short bullet points grouped by \
     time of day (Morning, Afternoon, Evening).",
);

static STRICT_SECTIONED_SYSTEM: PromptTemplate = PromptTemplate::from_static(
    "You are a meticulous travel assistant. Create a 1-day itinerary for {city} \
     tailored to these interests: {interests}. \
     Respond ONLY in Markdown using exactly this structure and nothing else:\n\
     ## Morning\n\
     - **Place name**: one-sentence description\n\
     ## Afternoon\n\
     - **Place name**: one-sentence description\n\
     ## Evening\n\
     - **Place name**: one-sentence description\n\
     Use two to four bullets per section. Do not add an introduction, a \
     conclusion, or any other headings.",
);

static BRIEF_BULLETED_SYSTEM: PromptTemplate = PromptTemplate::from_static(
    "You are a travel assistant. Suggest a brief 1-day plan for {city} \
     focused on: {interests}. Reply with at most six Markdown bullet points, \
     each starting with the time of day (e.g. \"Morning: ...\"). \
     No headings and no extra commentary.",
);

const HUMAN_INSTRUCTION: &str = "Please generate the itinerary.";

/// Selects which itinerary template is rendered.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateVariant {
    /// Bulleted Markdown grouped by time of day, loosely structured.
    #[default]
    FreeformMarkdown,
    /// Fixed heading and bullet grammar.
    StrictSectionedMarkdown,
    /// A short bulleted list.
    BriefBulleted,
}

impl TemplateVariant {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 3] = [
        Self::FreeformMarkdown,
        Self::StrictSectionedMarkdown,
        Self::BriefBulleted,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FreeformMarkdown => "freeform-markdown",
            Self::StrictSectionedMarkdown => "strict-sectioned-markdown",
            Self::BriefBulleted => "brief-bulleted",
        }
    }

    /// System instruction template for this variant.
    #[must_use]
    pub fn system_template(self) -> &'static PromptTemplate {
        match self {
            Self::FreeformMarkdown => &FREEFORM_SYSTEM,
            Self::StrictSectionedMarkdown => &STRICT_SECTIONED_SYSTEM,
            Self::BriefBulleted => &BRIEF_BULLETED_SYSTEM,
        }
    }

    /// Fixed human-turn instruction, shared by every variant.
    #[must_use]
    pub const fn human_instruction(self) -> &'static str {
        HUMAN_INSTRUCTION
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown variant name.
#[derive(Debug, thiserror::Error)]
#[error("unknown template variant `{0}` (expected freeform-markdown, strict-sectioned-markdown, or brief-bulleted)")]
pub struct UnknownVariant(pub String);

impl FromStr for TemplateVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownVariant(s.to_owned()))
    }
}
