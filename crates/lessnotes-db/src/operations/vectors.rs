//! Embedded-chunk storage and brute-force similarity search.

use crate::database::Database;
use crate::error::DbResult;
use lessnotes_core::{ScoredChunk, UserId};
use rusqlite::params;
use uuid::Uuid;

/// Collection name for an owner's chunks.
pub fn collection_key(owner: UserId) -> String {
    format!("user{}", owner)
}

/// Calculate cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot_product += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    dot_product / denominator
}

/// An embedded chunk ready for insertion.
#[derive(Debug, Clone)]
pub struct EmbeddedRow {
    pub source: String,
    pub content: String,
    pub metadata: serde_json::Value,
    pub vector: Vec<f32>,
}

fn vector_to_bytes(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

fn bytes_to_vector(bytes: &[u8], dimensions: usize) -> Vec<f32> {
    bytes
        .chunks(4)
        .take(dimensions)
        .map(|b| {
            if b.len() == 4 {
                f32::from_le_bytes([b[0], b[1], b[2], b[3]])
            } else {
                0.0
            }
        })
        .collect()
}

impl Database {
    /// Insert embedded rows into a collection, all or nothing.
    pub fn insert_embedded_rows(&self, collection: &str, rows: &[EmbeddedRow]) -> DbResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for row in rows {
            tx.execute(
                "INSERT INTO embeddings (id, collection, source, content, metadata, vector, dimensions)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    Uuid::new_v4().to_string(),
                    collection,
                    row.source,
                    row.content,
                    row.metadata.to_string(),
                    vector_to_bytes(&row.vector),
                    row.vector.len() as i64,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Delete every row in a collection whose source matches exactly.
    /// Returns the number of rows removed (zero is not an error).
    pub fn delete_embedded_by_source(&self, collection: &str, source: &str) -> DbResult<usize> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM embeddings WHERE collection = ?1 AND source = ?2",
            params![collection, source],
        )?;
        Ok(rows)
    }

    /// Rank a collection's rows against a query vector.
    ///
    /// Rows are scanned in insertion order and sorted with a stable sort, so
    /// equal scores keep insertion order. Brute force is fine at the scale of
    /// a personal notes collection.
    pub fn search_collection(
        &self,
        collection: &str,
        query_vector: &[f32],
        k: usize,
    ) -> DbResult<Vec<ScoredChunk>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT source, content, vector, dimensions FROM embeddings
             WHERE collection = ?1 ORDER BY rowid",
        )?;

        let rows = stmt.query_map(params![collection], |row| {
            let source: String = row.get(0)?;
            let content: String = row.get(1)?;
            let vector_bytes: Vec<u8> = row.get(2)?;
            let dimensions: i64 = row.get(3)?;
            Ok((source, content, vector_bytes, dimensions))
        })?;

        let mut results: Vec<ScoredChunk> = Vec::new();
        for row_result in rows {
            let (source, content, vector_bytes, dimensions) = row_result?;
            let vector = bytes_to_vector(&vector_bytes, dimensions as usize);

            results.push(ScoredChunk {
                content,
                source: Some(source),
                score: cosine_similarity(query_vector, &vector),
            });
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    /// Number of rows in a collection (test and status helper).
    pub fn collection_len(&self, collection: &str) -> DbResult<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM embeddings WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: &str, content: &str, vector: Vec<f32>) -> EmbeddedRow {
        EmbeddedRow {
            source: source.to_string(),
            content: content.to_string(),
            metadata: serde_json::json!({}),
            vector,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.0001);

        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.0001);

        let a: Vec<f32> = vec![];
        let b: Vec<f32> = vec![];
        assert_eq!(cosine_similarity(&a, &b), 0.0);

        let a = vec![1.0, 0.0];
        let b = vec![1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_search_ranks_by_similarity() {
        let db = Database::open_in_memory().unwrap();
        let collection = collection_key(1);

        db.insert_embedded_rows(
            &collection,
            &[
                row("a.txt", "about rust", vec![1.0, 0.0, 0.0]),
                row("b.txt", "about python", vec![0.0, 1.0, 0.0]),
            ],
        )
        .unwrap();

        let results = db
            .search_collection(&collection, &[0.9, 0.1, 0.0], 10)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source.as_deref(), Some("a.txt"));
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        let collection = collection_key(1);

        // Identical vectors produce identical scores.
        db.insert_embedded_rows(
            &collection,
            &[
                row("first.txt", "one", vec![1.0, 0.0]),
                row("second.txt", "two", vec![1.0, 0.0]),
            ],
        )
        .unwrap();

        let results = db.search_collection(&collection, &[1.0, 0.0], 10).unwrap();
        assert_eq!(results[0].source.as_deref(), Some("first.txt"));
        assert_eq!(results[1].source.as_deref(), Some("second.txt"));
    }

    #[test]
    fn test_delete_by_source_exact_match() {
        let db = Database::open_in_memory().unwrap();
        let collection = collection_key(1);

        db.insert_embedded_rows(
            &collection,
            &[
                row("a.txt", "one", vec![1.0]),
                row("a.txt", "two", vec![1.0]),
                row("a.txt.bak", "three", vec![1.0]),
            ],
        )
        .unwrap();

        let removed = db.delete_embedded_by_source(&collection, "a.txt").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(db.collection_len(&collection).unwrap(), 1);

        // No matches is a no-op, not an error
        let removed = db.delete_embedded_by_source(&collection, "a.txt").unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_collections_are_isolated() {
        let db = Database::open_in_memory().unwrap();

        db.insert_embedded_rows(&collection_key(1), &[row("a.txt", "one", vec![1.0])])
            .unwrap();
        db.insert_embedded_rows(&collection_key(2), &[row("b.txt", "two", vec![1.0])])
            .unwrap();

        let results = db
            .search_collection(&collection_key(1), &[1.0], 10)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source.as_deref(), Some("a.txt"));
    }
}
