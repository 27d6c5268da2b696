//! Content digests for change detection.

use crate::error::{IngestError, IngestResult};
use sha2::{Digest, Sha256, Sha512};
use std::io::Read;
use std::path::Path;

const READ_BUFFER_SIZE: usize = 8192;

/// Digest algorithm used for file change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Parse an algorithm name as it appears in configuration.
    pub fn parse(name: &str) -> IngestResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(IngestError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Compute the hex digest of a file's contents.
///
/// Reads in bounded-size chunks so large files never land in memory whole.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> IngestResult<String> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    match algorithm {
        HashAlgorithm::Sha256 => stream_digest::<Sha256>(path),
        HashAlgorithm::Sha512 => stream_digest::<Sha512>(path),
    }
}

fn stream_digest<D: Digest>(path: &Path) -> IngestResult<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = D::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    Ok(hex)
}
