//! Lessnotes Ingest - file tracking and indexing.
//!
//! Walks a user's file tree, reconciles it against the file registry and the
//! embedding collection, and re-indexes only the files whose content changed
//! since the last pass.

mod chunker;
mod error;
mod hasher;
mod loader;
mod pipeline;
mod registry;

pub use chunker::Chunker;
pub use error::{IngestError, IngestResult};
pub use hasher::{hash_file, HashAlgorithm};
pub use loader::load_content;
pub use pipeline::{IngestPipeline, ProcessReport};
pub use registry::FileRegistry;
