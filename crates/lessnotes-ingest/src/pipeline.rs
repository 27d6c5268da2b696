//! Reconciliation and indexing pipeline.
//!
//! A processing pass walks the owner's file tree, reconciles the registry
//! against what is actually on disk, prunes vectors for files that are gone,
//! and re-indexes every record whose content is not yet reflected in the
//! owner's collection. Passes for the same owner are serialized; different
//! owners proceed independently.

use crate::chunker::Chunker;
use crate::error::{IngestError, IngestResult};
use crate::loader::load_content;
use crate::registry::FileRegistry;
use lessnotes_core::{FileRecord, SourceChunk, UserId, VectorStore};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Outcome of a processing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Files found by the scan.
    pub discovered: usize,
    /// Records whose content was (re-)indexed this pass.
    pub indexed: usize,
    /// Records pruned because their file is no longer on disk.
    pub removed: usize,
    /// Records whose indexing failed; they stay unprocessed for the next
    /// pass.
    pub failed: usize,
}

/// Drives reconciliation between disk, the file registry and the vector
/// store.
pub struct IngestPipeline<V> {
    registry: FileRegistry,
    store: V,
    chunker: Chunker,
    ignore_patterns: Vec<glob::Pattern>,
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl<V: VectorStore> IngestPipeline<V> {
    pub fn new(
        registry: FileRegistry,
        store: V,
        chunker: Chunker,
        ignore_patterns: &[String],
    ) -> IngestResult<Self> {
        let patterns = ignore_patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| IngestError::InvalidPattern {
                    pattern: p.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<IngestResult<Vec<_>>>()?;

        Ok(Self {
            registry,
            store,
            chunker,
            ignore_patterns: patterns,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Run one full reconciliation pass for an owner's file tree.
    ///
    /// Concurrent passes for the same owner are serialized so two runs never
    /// interleave registry and vector writes.
    pub async fn process_owner(&self, owner: UserId, root: &Path) -> IngestResult<ProcessReport> {
        let lock = self.owner_lock(owner).await;
        let _guard = lock.lock().await;

        let paths = self.scan(root)?;
        debug!("Scan of {} found {} files", root.display(), paths.len());

        let mut fresh_ids = HashSet::new();
        for path in &paths {
            let record = self.registry.register_or_update(path, owner)?;
            fresh_ids.insert(record.id);
        }

        // Records the scan did not produce have lost their backing file,
        // either deleted outright or superseded by changed content at the
        // same path. Vectors go first so an interrupted run cannot leave
        // orphaned chunks behind a missing record.
        let mut removed = 0;
        for record in self.registry.list_by_owner(owner)? {
            if !fresh_ids.contains(&record.id) {
                self.store.delete_by_source(owner, &record.path)?;
                self.registry.delete(record.id)?;
                removed += 1;
            }
        }

        let mut indexed = 0;
        let mut failed = 0;
        for record in self.registry.list_by_owner(owner)? {
            if record.processed {
                continue;
            }
            match self.index_file(owner, &record).await {
                Ok(chunks) => {
                    self.registry.mark_processed(record.id)?;
                    debug!("Indexed {} ({} chunks)", record.path, chunks);
                    indexed += 1;
                }
                Err(e) => {
                    warn!("Indexing {} failed, will retry next pass: {}", record.path, e);
                    failed += 1;
                }
            }
        }

        info!(
            "Processed owner {}: {} discovered, {} indexed, {} removed, {} failed",
            owner, paths.len(), indexed, removed, failed
        );

        Ok(ProcessReport {
            discovered: paths.len(),
            indexed,
            removed,
            failed,
        })
    }

    /// Re-embed one file. Stale vectors are deleted before new ones are
    /// added, so a failure part-way leaves zero chunks rather than a mix of
    /// old and new.
    async fn index_file(&self, owner: UserId, record: &FileRecord) -> IngestResult<usize> {
        self.store.delete_by_source(owner, &record.path)?;

        let content = load_content(Path::new(&record.path))?;
        let chunks: Vec<SourceChunk> = self
            .chunker
            .split(&content)
            .into_iter()
            .map(|window| {
                SourceChunk::new(window, &record.path)
                    .with_metadata(serde_json::json!({ "source": record.path }))
            })
            .collect();

        self.store.add(owner, &chunks).await?;
        Ok(chunks.len())
    }

    /// Collect live file paths under `root`, skipping hidden entries and
    /// configured ignore patterns. A missing root is an empty tree.
    fn scan(&self, root: &Path) -> IngestResult<Vec<PathBuf>> {
        if !root.exists() {
            return Ok(vec![]);
        }

        let mut paths = Vec::new();
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry.map_err(|e| IngestError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if self.is_ignored(&entry) {
                continue;
            }
            paths.push(entry.into_path());
        }

        Ok(paths)
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.ignore_patterns.iter().any(|p| p.matches(&name))
    }

    async fn owner_lock(&self, owner: UserId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(owner)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::HashAlgorithm;
    use lessnotes_config::ChunkingConfig;
    use lessnotes_core::Embedder;
    use lessnotes_db::{Database, NewUser, SqliteVectorStore};
    use std::io::Write;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    /// Deterministic embedder: letter-frequency vector over a..z, with a
    /// switch to simulate an offline embedding backend.
    #[derive(Clone)]
    struct StubEmbedder {
        healthy: Arc<AtomicBool>,
    }

    impl StubEmbedder {
        fn new() -> Self {
            Self {
                healthy: Arc::new(AtomicBool::new(true)),
            }
        }

        fn set_healthy(&self, healthy: bool) {
            self.healthy.store(healthy, Ordering::SeqCst);
        }
    }

    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> lessnotes_core::Result<Vec<f32>> {
            if !self.healthy.load(Ordering::SeqCst) {
                return Err(lessnotes_core::Error::Model(
                    "embedding backend offline".to_string(),
                ));
            }
            let mut vector = vec![0.0f32; 26];
            for c in text.chars().flat_map(|c| c.to_lowercase()) {
                if c.is_ascii_lowercase() {
                    vector[(c as u8 - b'a') as usize] += 1.0;
                }
            }
            Ok(vector)
        }
    }

    struct Fixture {
        pipeline: IngestPipeline<SqliteVectorStore<StubEmbedder>>,
        store: SqliteVectorStore<StubEmbedder>,
        embedder: StubEmbedder,
        owner: UserId,
        dir: TempDir,
    }

    fn fixture() -> Fixture {
        fixture_with_ignores(&[])
    }

    fn fixture_with_ignores(ignore_patterns: &[String]) -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user(&NewUser {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
                display_name: None,
                school: None,
                major: None,
            })
            .unwrap();

        let embedder = StubEmbedder::new();
        let store = SqliteVectorStore::new(db.clone(), embedder.clone());
        let registry = FileRegistry::new(db, HashAlgorithm::Sha256);
        let chunker = Chunker::new(ChunkingConfig::default());
        let pipeline =
            IngestPipeline::new(registry, store.clone(), chunker, ignore_patterns).unwrap();

        Fixture {
            pipeline,
            store,
            embedder,
            owner: user.id,
            dir: TempDir::new().unwrap(),
        }
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_process_then_retrieve() {
        let f = fixture();
        write_file(f.dir.path(), "notes.txt", "The sky is blue.");

        let report = f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();
        assert_eq!(report.discovered, 1);
        assert_eq!(report.indexed, 1);
        assert_eq!(report.failed, 0);

        let results = f
            .store
            .similarity_search(f.owner, "What color is the sky?", 4)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains("sky is blue"));
        assert!(results[0].source.as_deref().unwrap().ends_with("notes.txt"));
    }

    #[tokio::test]
    async fn test_second_pass_is_incremental() {
        let f = fixture();
        write_file(f.dir.path(), "notes.txt", "The sky is blue.");

        f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();
        let report = f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();

        // Unchanged content is re-registered and re-indexed exactly once per
        // pass, never duplicated.
        assert_eq!(report.discovered, 1);
        let results = f.store.similarity_search(f.owner, "sky", 4).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_deletion_propagates() {
        let f = fixture();
        let path = write_file(f.dir.path(), "notes.txt", "The sky is blue.");

        f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let report = f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();
        assert_eq!(report.removed, 1);

        let results = f.store.similarity_search(f.owner, "sky", 4).await.unwrap();
        assert!(results.is_empty());
        assert!(f.pipeline.registry.list_by_owner(f.owner).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_changed_content_replaces_old_chunks() {
        let f = fixture();
        write_file(f.dir.path(), "notes.txt", "The sky is blue.");
        f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();

        write_file(f.dir.path(), "notes.txt", "The grass is green.");
        let report = f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();

        // Old digest's record is pruned, the new one indexed.
        assert_eq!(report.removed, 1);
        assert_eq!(report.indexed, 1);

        let records = f.pipeline.registry.list_by_owner(f.owner).unwrap();
        assert_eq!(records.len(), 1);

        let results = f.store.similarity_search(f.owner, "grass", 4).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains("grass is green"));
    }

    #[tokio::test]
    async fn test_failed_indexing_retries_cleanly() {
        let f = fixture();
        write_file(f.dir.path(), "notes.txt", "The sky is blue.");

        f.embedder.set_healthy(false);
        let report = f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.indexed, 0);

        let records = f.pipeline.registry.list_by_owner(f.owner).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].processed);

        // The next pass converges: exactly one copy of the chunk, no
        // leftovers from the failed attempt.
        f.embedder.set_healthy(true);
        let report = f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();
        assert_eq!(report.indexed, 1);

        let results = f.store.similarity_search(f.owner, "sky", 4).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(f.pipeline.registry.list_by_owner(f.owner).unwrap()[0].processed);
    }

    #[tokio::test]
    async fn test_hidden_and_ignored_files_skipped() {
        let f = fixture_with_ignores(&["*.tmp".to_string()]);
        write_file(f.dir.path(), ".secret.txt", "hidden");
        write_file(f.dir.path(), "draft.tmp", "scratch");
        write_file(f.dir.path(), "sub/note.txt", "The sky is blue.");
        write_file(f.dir.path(), ".cache/other.txt", "also hidden");

        let report = f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();
        assert_eq!(report.discovered, 1);

        let records = f.pipeline.registry.list_by_owner(f.owner).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].path.ends_with("note.txt"));
    }

    #[tokio::test]
    async fn test_missing_root_prunes_everything() {
        let f = fixture();
        write_file(f.dir.path(), "notes.txt", "The sky is blue.");
        f.pipeline.process_owner(f.owner, f.dir.path()).await.unwrap();

        let gone = f.dir.path().join("nowhere");
        let report = f.pipeline.process_owner(f.owner, &gone).await.unwrap();
        assert_eq!(report.discovered, 0);
        assert_eq!(report.removed, 1);
        assert!(f.pipeline.registry.list_by_owner(f.owner).unwrap().is_empty());
    }
}
