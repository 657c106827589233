//! Shared error definitions for trip planner primitives.

use thiserror::Error;

/// Result alias used throughout the trip planner.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing trip planner primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The trip request failed validation before any prompt was rendered.
    #[error("invalid trip request: {reason}")]
    Validation {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// An interest name did not match the catalogue.
    #[error("unknown interest `{name}`")]
    UnknownInterest {
        /// The offending interest name.
        name: String,
    },
}

impl Error {
    /// Convenience constructor for validation failures.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Returns `true` when the error is a caller-side validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
