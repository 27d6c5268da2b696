//! Database error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Integrity conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Database error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        // Duplicate-key violations are reported distinctly from generic
        // storage errors.
        if let rusqlite::Error::SqliteFailure(e, ref msg) = err {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                return DbError::Conflict(msg.clone().unwrap_or_else(|| e.to_string()));
            }
        }
        DbError::Sqlite(err)
    }
}

impl From<DbError> for lessnotes_core::Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => lessnotes_core::Error::NotFound(msg),
            DbError::Conflict(msg) => lessnotes_core::Error::Conflict(msg),
            other => lessnotes_core::Error::Storage(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
