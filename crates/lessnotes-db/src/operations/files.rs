//! File registry row operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use lessnotes_core::{FileId, FileRecord, UserId};
use rusqlite::params;

impl Database {
    /// Insert a new registry row with `processed = false`.
    ///
    /// A second row for the same `(hash, owner)` pair violates the table's
    /// uniqueness constraint and surfaces as `DbError::Conflict`.
    pub fn insert_file(&self, hash: &str, path: &str, owner: UserId) -> DbResult<FileRecord> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO files (hash, path, user_id, processed) VALUES (?1, ?2, ?3, 0)",
            params![hash, path, owner],
        )?;

        let id = conn.last_insert_rowid();
        Ok(FileRecord {
            id,
            content_hash: hash.to_string(),
            path: path.to_string(),
            owner_id: owner,
            processed: false,
        })
    }

    /// Find a registry row by content hash and owner.
    pub fn find_file_by_hash(&self, hash: &str, owner: UserId) -> DbResult<Option<FileRecord>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT id, hash, path, user_id, processed FROM files
             WHERE hash = ?1 AND user_id = ?2",
            params![hash, owner],
            row_to_file,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// Get a registry row by id.
    pub fn get_file(&self, id: FileId) -> DbResult<FileRecord> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, hash, path, user_id, processed FROM files WHERE id = ?1",
            params![id],
            row_to_file,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("File not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// List an owner's registry rows ordered by id.
    pub fn list_files_by_owner(&self, owner: UserId) -> DbResult<Vec<FileRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, hash, path, user_id, processed FROM files
             WHERE user_id = ?1 ORDER BY id",
        )?;

        let records = stmt.query_map(params![owner], row_to_file)?;
        records.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Update a row's stored path. Used when previously seen content shows
    /// up at a new location.
    pub fn update_file_path(&self, id: FileId, path: &str) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE files SET path = ?2 WHERE id = ?1",
            params![id, path],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("File not found: {}", id)));
        }

        Ok(())
    }

    /// Set a row's processed flag.
    pub fn set_file_processed(&self, id: FileId, processed: bool) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE files SET processed = ?2 WHERE id = ?1",
            params![id, processed],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("File not found: {}", id)));
        }

        Ok(())
    }

    /// Delete a registry row. The caller is responsible for removing the
    /// associated vectors first.
    pub fn delete_file(&self, id: FileId) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM files WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("File not found: {}", id)));
        }

        Ok(())
    }
}

fn row_to_file(row: &rusqlite::Row) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        content_hash: row.get(1)?,
        path: row.get(2)?,
        owner_id: row.get(3)?,
        processed: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::users::NewUser;

    fn db_with_owner() -> (Database, UserId) {
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
        (db, user.id)
    }

    #[test]
    fn test_file_row_lifecycle() {
        let (db, owner) = db_with_owner();

        let record = db.insert_file("abc", "/notes/a.txt", owner).unwrap();
        assert!(!record.processed);

        db.set_file_processed(record.id, true).unwrap();
        let fetched = db.get_file(record.id).unwrap();
        assert!(fetched.processed);

        db.delete_file(record.id).unwrap();
        assert!(matches!(
            db.get_file(record.id),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_hash_owner_is_conflict() {
        let (db, owner) = db_with_owner();

        db.insert_file("abc", "/notes/a.txt", owner).unwrap();
        let result = db.insert_file("abc", "/notes/copy.txt", owner);
        assert!(matches!(result, Err(DbError::Conflict(_))));
    }

    #[test]
    fn test_list_ordered_by_id() {
        let (db, owner) = db_with_owner();

        db.insert_file("h1", "/notes/a.txt", owner).unwrap();
        db.insert_file("h2", "/notes/b.txt", owner).unwrap();
        db.insert_file("h3", "/notes/c.txt", owner).unwrap();

        let records = db.list_files_by_owner(owner).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].id < w[1].id));
    }
}
