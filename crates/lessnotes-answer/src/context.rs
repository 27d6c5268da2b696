//! Retrieved-context formatting.

use lessnotes_core::ScoredChunk;

/// Serialize retrieved chunks as a JSON list of `{content, source}` pairs.
///
/// The prompt embeds this structure rather than raw concatenated text so the
/// model can cite sources the post-processing step understands. A chunk
/// without source metadata is attributed to "Unknown".
pub fn format_context(chunks: &[ScoredChunk]) -> String {
    let items: Vec<serde_json::Value> = chunks
        .iter()
        .map(|chunk| {
            serde_json::json!({
                "content": chunk.content,
                "source": chunk.source.as_deref().unwrap_or("Unknown"),
            })
        })
        .collect();

    serde_json::Value::Array(items).to_string()
}
