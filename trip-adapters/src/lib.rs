//! Text-generation backends and the client that drives them.
//!
//! [`client::GenerationClient`] performs one call per invocation through any
//! [`traits::ChatBackend`]; [`openai`] provides the HTTPS backend for
//! OpenAI-compatible services such as Groq.

#![warn(missing_docs, clippy::pedantic)]

pub mod client;
pub mod openai;
pub mod secret;
pub mod traits;

mod http_client;

pub use client::{GenerationClient, GenerationOptions};
pub use secret::ApiKey;
pub use traits::{ChatBackend, ErrorClass, GenerationError, GenerationResult};
