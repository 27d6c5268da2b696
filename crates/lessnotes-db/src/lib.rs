//! Lessnotes DB - SQLite storage layer for lessnotes.
//!
//! Holds the user directory, conversation/message store, the file registry
//! rows, and the per-owner embedding collections backing the vector store.

mod database;
mod error;
mod migrations;
mod operations;
mod store;

pub use database::Database;
pub use error::{DbError, DbResult};
pub use operations::users::NewUser;
pub use operations::vectors::{collection_key, cosine_similarity, EmbeddedRow};
pub use store::SqliteVectorStore;
