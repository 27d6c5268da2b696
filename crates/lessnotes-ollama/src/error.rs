//! Error types for Ollama operations.

use thiserror::Error;

/// Errors that can occur when interacting with Ollama.
#[derive(Error, Debug)]
pub enum OllamaError {
    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The requested model is not available.
    #[error("Model not found: {model}. Run 'ollama pull {model}' to download it.")]
    ModelNotFound { model: String },

    /// Ollama server is not running.
    #[error("Ollama server is not running at {host}. Start it with 'ollama serve'.")]
    ServerNotRunning { host: String },

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OllamaError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            OllamaError::Timeout { .. } | OllamaError::ServerNotRunning { .. } => true,
            OllamaError::ApiError { status, .. } => *status >= 500,
            OllamaError::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

impl From<OllamaError> for lessnotes_core::Error {
    fn from(err: OllamaError) -> Self {
        lessnotes_core::Error::Model(err.to_string())
    }
}

/// Result type for Ollama operations.
pub type OllamaResult<T> = Result<T, OllamaError>;
