//! Core shared types for the trip planner.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod interest;
mod request;

/// Error type and result alias shared across the planner.
pub use error::{Error, Result};
/// Correlation identifier for one planning call.
pub use ids::RequestId;
/// Interest catalogue offered to travellers.
pub use interest::Interest;
/// Validated city and interest selection.
pub use request::{TripRequest, TripRequestBuilder};
