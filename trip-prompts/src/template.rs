//! Prompt templates with `{name}` placeholder substitution.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while rendering a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A placeholder in the template had no value supplied.
    #[error("missing value for placeholder: {name}")]
    MissingVariable {
        /// Name of the placeholder.
        name: String,
    },
}

/// A prompt template with `{name}` placeholders.
///
/// Substitution is a single left-to-right pass, so braces inside substituted
/// values are never expanded again. A `{` that does not open a well-formed
/// placeholder (lowercase ASCII letters and underscores) is copied verbatim.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use trip_prompts::template::PromptTemplate;
///
/// let template = PromptTemplate::from_static("Plan a day in {city}.");
/// let vars = HashMap::from([("city", "Lisbon")]);
/// assert_eq!(template.render(&vars).unwrap(), "Plan a day in Lisbon.");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    template: Cow<'static, str>,
}

impl PromptTemplate {
    /// Wraps a static template string.
    #[must_use]
    pub const fn from_static(template: &'static str) -> Self {
        Self {
            template: Cow::Borrowed(template),
        }
    }

    /// Creates a template from owned text.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: Cow::Owned(template.into()),
        }
    }

    /// Returns the placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for segment in Segments::new(&self.template) {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Renders the template, substituting every placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] if a placeholder has no value.
    pub fn render(&self, vars: &HashMap<&str, &str>) -> TemplateResult<String> {
        let mut rendered = String::with_capacity(self.template.len());
        for segment in Segments::new(&self.template) {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => {
                    let value = vars.get(name).ok_or_else(|| TemplateError::MissingVariable {
                        name: name.to_owned(),
                    })?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }

    /// Returns the raw template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Splits a template into literal runs and placeholders.
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    const fn new(template: &'a str) -> Self {
        Self { rest: template }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        if let Some(name) = placeholder_at_start(self.rest) {
            self.rest = &self.rest[name.len() + 2..];
            return Some(Segment::Placeholder(name));
        }

        // Skip the first byte so a lone `{` is emitted as literal text.
        let search_from = usize::from(self.rest.starts_with('{'));
        let end = self.rest[search_from..]
            .find('{')
            .map_or(self.rest.len(), |idx| idx + search_from);
        let (literal, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Segment::Literal(literal))
    }
}

fn placeholder_at_start(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('{')?;
    let close = inner.find('}')?;
    let name = &inner[..close];
    let well_formed = !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase() || b == b'_');
    well_formed.then_some(name)
}
