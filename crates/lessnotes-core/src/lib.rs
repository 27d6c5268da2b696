//! Lessnotes Core - Domain types and collaborator traits for the lessnotes assistant.

mod error;
mod store;
mod types;

pub use error::{Error, Result};
pub use store::{Embedder, LanguageModel, VectorStore};
pub use types::*;
