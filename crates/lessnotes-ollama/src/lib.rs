//! Lessnotes Ollama - Ollama integration for embeddings and generation.
//!
//! Provides an async client for Ollama's API with request timeouts and
//! bounded retry, and implements the core `Embedder` and `LanguageModel`
//! traits used by the ingestion and answer pipelines.

mod client;
mod error;
mod types;

pub use client::OllamaClient;
pub use error::{OllamaError, OllamaResult};
pub use types::*;
