//! File registry reconciliation against the database.

use crate::error::IngestResult;
use crate::hasher::{hash_file, HashAlgorithm};
use lessnotes_core::{FileId, FileRecord, UserId};
use lessnotes_db::Database;
use std::path::Path;
use tracing::debug;

/// Tracks which files belong to an owner and whether each has been indexed.
///
/// One record exists per `(content digest, owner)` pair. Registering content
/// that is already tracked reuses the record instead of duplicating it.
#[derive(Clone)]
pub struct FileRegistry {
    db: Database,
    algorithm: HashAlgorithm,
}

impl FileRegistry {
    pub fn new(db: Database, algorithm: HashAlgorithm) -> Self {
        Self { db, algorithm }
    }

    /// Register a file discovered on disk, or refresh its existing record.
    ///
    /// On a digest hit the record is reused: its path is refreshed (the same
    /// content may have moved) and `processed` is reset so the next indexing
    /// pass picks it up. A fresh record always starts unprocessed.
    pub fn register_or_update(&self, path: &Path, owner: UserId) -> IngestResult<FileRecord> {
        let digest = hash_file(path, self.algorithm)?;
        let path_str = path.to_string_lossy().into_owned();

        match self.db.find_file_by_hash(&digest, owner)? {
            Some(existing) => {
                debug!("Digest hit for {}, reusing record {}", path_str, existing.id);
                if existing.path != path_str {
                    self.db.update_file_path(existing.id, &path_str)?;
                }
                self.db.set_file_processed(existing.id, false)?;
                Ok(FileRecord {
                    path: path_str,
                    processed: false,
                    ..existing
                })
            }
            None => {
                debug!("Registering new file {} for owner {}", path_str, owner);
                Ok(self.db.insert_file(&digest, &path_str, owner)?)
            }
        }
    }

    /// All records for an owner, ordered by id.
    pub fn list_by_owner(&self, owner: UserId) -> IngestResult<Vec<FileRecord>> {
        Ok(self.db.list_files_by_owner(owner)?)
    }

    /// Remove a record. Vector cleanup is the caller's responsibility and
    /// must happen first.
    pub fn delete(&self, id: FileId) -> IngestResult<()> {
        Ok(self.db.delete_file(id)?)
    }

    /// Mark a record's content as fully indexed.
    pub fn mark_processed(&self, id: FileId) -> IngestResult<()> {
        Ok(self.db.set_file_processed(id, true)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessnotes_db::NewUser;
    use std::io::Write;
    use tempfile::TempDir;

    fn registry_with_owner() -> (FileRegistry, UserId, TempDir) {
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
        let registry = FileRegistry::new(db, HashAlgorithm::Sha256);
        (registry, user.id, TempDir::new().unwrap())
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_registration_is_idempotent() {
        let (registry, owner, dir) = registry_with_owner();
        let path = write_file(&dir, "notes.txt", "The sky is blue.");

        let first = registry.register_or_update(&path, owner).unwrap();
        let second = registry.register_or_update(&path, owner).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(registry.list_by_owner(owner).unwrap().len(), 1);
    }

    #[test]
    fn test_rehit_resets_processed() {
        let (registry, owner, dir) = registry_with_owner();
        let path = write_file(&dir, "notes.txt", "The sky is blue.");

        let record = registry.register_or_update(&path, owner).unwrap();
        registry.mark_processed(record.id).unwrap();

        let refreshed = registry.register_or_update(&path, owner).unwrap();
        assert_eq!(refreshed.id, record.id);
        assert!(!refreshed.processed);
        assert!(!registry.list_by_owner(owner).unwrap()[0].processed);
    }

    #[test]
    fn test_same_content_two_paths_one_record() {
        let (registry, owner, dir) = registry_with_owner();
        let original = write_file(&dir, "a.txt", "identical content");
        let copy = write_file(&dir, "b.txt", "identical content");

        let first = registry.register_or_update(&original, owner).unwrap();
        let second = registry.register_or_update(&copy, owner).unwrap();

        assert_eq!(first.id, second.id);
        // The record follows the most recently registered location.
        assert_eq!(second.path, copy.to_string_lossy());
        assert_eq!(registry.list_by_owner(owner).unwrap().len(), 1);
    }

    #[test]
    fn test_changed_content_new_record() {
        let (registry, owner, dir) = registry_with_owner();
        let path = write_file(&dir, "notes.txt", "version one");
        let first = registry.register_or_update(&path, owner).unwrap();

        write_file(&dir, "notes.txt", "version two");
        let second = registry.register_or_update(&path, owner).unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.content_hash, second.content_hash);
    }
}
