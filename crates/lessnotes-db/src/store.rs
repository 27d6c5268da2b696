//! SQLite-backed implementation of the core `VectorStore` trait.

use crate::database::Database;
use crate::operations::vectors::{collection_key, EmbeddedRow};
use lessnotes_core::{Embedder, Result, ScoredChunk, SourceChunk, UserId, VectorStore};
use tracing::debug;

/// Vector store over the `embeddings` table, one collection per owner.
///
/// The embedder is generic so tests can swap in a deterministic stub.
#[derive(Clone)]
pub struct SqliteVectorStore<E> {
    db: Database,
    embedder: E,
}

impl<E> SqliteVectorStore<E> {
    pub fn new(db: Database, embedder: E) -> Self {
        Self { db, embedder }
    }
}

/// Keep only flat primitive metadata fields; the persistence layer cannot
/// index nested values.
fn flatten_metadata(metadata: &serde_json::Value) -> serde_json::Value {
    match metadata.as_object() {
        Some(map) => {
            let flat: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .filter(|(_, v)| v.is_string() || v.is_number() || v.is_boolean())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            serde_json::Value::Object(flat)
        }
        None => serde_json::json!({}),
    }
}

impl<E: Embedder + Sync> VectorStore for SqliteVectorStore<E> {
    async fn add(&self, owner: UserId, chunks: &[SourceChunk]) -> Result<()> {
        let mut rows = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = self.embedder.embed(&chunk.text).await?;
            rows.push(EmbeddedRow {
                source: chunk.source_path.clone(),
                content: chunk.text.clone(),
                metadata: flatten_metadata(&chunk.metadata),
                vector,
            });
        }

        let collection = collection_key(owner);
        debug!("Adding {} chunks to collection {}", rows.len(), collection);
        self.db.insert_embedded_rows(&collection, &rows)?;
        Ok(())
    }

    async fn similarity_search(
        &self,
        owner: UserId,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let query_vector = self.embedder.embed(query).await?;
        let results = self
            .db
            .search_collection(&collection_key(owner), &query_vector, k)?;
        Ok(results)
    }

    fn delete_by_source(&self, owner: UserId, source_path: &str) -> Result<()> {
        let removed = self
            .db
            .delete_embedded_by_source(&collection_key(owner), source_path)?;
        if removed > 0 {
            debug!("Removed {} chunks for source {}", removed, source_path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic embedder: letter-frequency vector over a..z.
    struct StubEmbedder;

    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut vector = vec![0.0f32; 26];
            for c in text.chars().flat_map(|c| c.to_lowercase()) {
                if c.is_ascii_lowercase() {
                    vector[(c as u8 - b'a') as usize] += 1.0;
                }
            }
            Ok(vector)
        }
    }

    fn store() -> SqliteVectorStore<StubEmbedder> {
        SqliteVectorStore::new(Database::open_in_memory().unwrap(), StubEmbedder)
    }

    #[tokio::test]
    async fn test_add_then_search() {
        let store = store();

        store
            .add(
                7,
                &[
                    SourceChunk::new("The sky is blue.", "notes.txt"),
                    SourceChunk::new("Compilers translate programs.", "compilers.txt"),
                ],
            )
            .await
            .unwrap();

        let results = store
            .similarity_search(7, "What color is the sky?", 4)
            .await
            .unwrap();
        assert_eq!(results[0].source.as_deref(), Some("notes.txt"));
        assert!(results[0].content.contains("sky is blue"));
    }

    #[tokio::test]
    async fn test_delete_by_source_empties_search() {
        let store = store();

        store
            .add(7, &[SourceChunk::new("The sky is blue.", "notes.txt")])
            .await
            .unwrap();
        store.delete_by_source(7, "notes.txt").unwrap();

        let results = store.similarity_search(7, "sky", 4).await.unwrap();
        assert!(results.is_empty());

        // Deleting again is still a no-op
        store.delete_by_source(7, "notes.txt").unwrap();
    }

    #[tokio::test]
    async fn test_search_is_deterministic() {
        let store = store();
        store
            .add(
                1,
                &[
                    SourceChunk::new("apples and oranges", "fruit.txt"),
                    SourceChunk::new("trains and planes", "travel.txt"),
                ],
            )
            .await
            .unwrap();

        let first = store.similarity_search(1, "apples", 4).await.unwrap();
        let second = store.similarity_search(1, "apples", 4).await.unwrap();
        let sources: Vec<_> = first.iter().map(|c| c.source.clone()).collect();
        let sources_again: Vec<_> = second.iter().map(|c| c.source.clone()).collect();
        assert_eq!(sources, sources_again);
    }

    #[test]
    fn test_metadata_flattening() {
        let metadata = serde_json::json!({
            "source": "notes.txt",
            "page": 3,
            "nested": {"drop": "me"},
            "list": [1, 2, 3],
            "ok": true,
        });

        let flat = flatten_metadata(&metadata);
        assert_eq!(flat["source"], "notes.txt");
        assert_eq!(flat["page"], 3);
        assert_eq!(flat["ok"], true);
        assert!(flat.get("nested").is_none());
        assert!(flat.get("list").is_none());
    }
}
