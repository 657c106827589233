//! Logging setup for trip planner binaries.
//!
//! Library crates only emit `tracing` events; binaries call [`init`] once.

#![warn(missing_docs, clippy::pedantic)]

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Builds the filter from `RUST_LOG`, falling back to `default_directive`.
#[must_use]
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Installs the global subscriber, writing to stderr so stdout stays
/// reserved for itineraries.
///
/// Returns `false` if a subscriber was already installed.
pub fn init(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(env_filter(default_directive))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
