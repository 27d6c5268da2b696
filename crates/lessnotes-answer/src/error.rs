//! Error types for the answer pipeline.

use thiserror::Error;

/// Result type for answer operations.
pub type AnswerResult<T> = Result<T, AnswerError>;

/// Errors that can occur while answering a question.
#[derive(Error, Debug)]
pub enum AnswerError {
    /// A required request field is missing or empty. Rejected before any
    /// model call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] lessnotes_db::DbError),

    /// Retrieval or model-call failure.
    #[error("Pipeline error: {0}")]
    Core(#[from] lessnotes_core::Error),
}
