//! Backend credential wrapper.

use std::fmt;

use crate::traits::{GenerationError, GenerationResult};

/// A backend API key. Never printed: `Debug` is redacted and there is no
/// `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a credential after checking it can be sent in a header.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] if the key is blank or
    /// contains whitespace or control characters.
    pub fn new(key: impl Into<String>) -> GenerationResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(GenerationError::configuration("API key is empty"));
        }
        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(GenerationError::configuration(
                "API key contains whitespace or control characters",
            ));
        }
        Ok(Self(key))
    }

    /// Returns the raw credential for the authorization header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
