//! Collaborator traits at the seams of the ingestion and answer pipelines.
//!
//! The vector store is behind a trait so the underlying engine is swappable;
//! the embedder and language model are behind traits so pipelines can be
//! exercised in tests with deterministic stubs.

use crate::error::Result;
use crate::types::{ScoredChunk, SourceChunk, UserId};

/// Produces embedding vectors for text.
pub trait Embedder {
    fn embed(&self, text: &str) -> impl std::future::Future<Output = Result<Vec<f32>>> + Send;
}

/// Completes a text prompt.
pub trait LanguageModel {
    fn complete(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Per-owner embedding collection.
///
/// One logical collection exists per owner identifier. After
/// `delete_by_source(owner, p)` returns, no search on that owner's collection
/// may return a chunk with source `p` until a later `add` reintroduces one.
pub trait VectorStore {
    /// Append chunks to the owner's collection.
    fn add(
        &self,
        owner: UserId,
        chunks: &[SourceChunk],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Rank the owner's chunks against a query text. Ties break by
    /// insertion order.
    fn similarity_search(
        &self,
        owner: UserId,
        query: &str,
        k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredChunk>>> + Send;

    /// Delete every chunk whose source exactly matches `source_path`.
    /// A no-op when nothing matches.
    fn delete_by_source(&self, owner: UserId, source_path: &str) -> Result<()>;
}
