//! Configuration structures and loading.

use crate::error::ConfigResult;
use crate::paths::AppPaths;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub answer: AnswerConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&paths.config_file)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        let default_config = Self::default_config_string();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config)?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Lessnotes Configuration
# Personal notes question-answering assistant

[general]
# Data directory for database and user files
# data_dir = "~/.local/share/lessnotes"

[ollama]
# Ollama server address
host = "http://localhost:11434"

# Default model for answering and question reformulation
model = "llama3.2"

# Model for generating embeddings
embedding_model = "mxbai-embed-large"

# Request timeout in seconds
timeout_seconds = 120

[files]
# Digest algorithm for change detection: sha256 or sha512
hash_algorithm = "sha256"

# File patterns skipped during the processing scan
# (hidden dot-files are always skipped)
ignore_patterns = [
    "*.tmp",
    "*.temp",
    "*.part",
]

[chunking]
# Characters per text window
window_size = 1024

# Overlap between adjacent windows; kept large relative to the
# window size to favor recall over storage
window_overlap = 512

# Windows smaller than this are merged into a neighbor
min_window_size = 64

[retrieval]
# Number of chunks retrieved per question
top_k = 4

[answer]
# Sources returned to the caller are stripped up to and including
# this path marker
source_marker = "data/"
"#
        .to_string()
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

/// Ollama LLM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub model: String,
    pub embedding_model: String,
    pub timeout_seconds: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            embedding_model: "mxbai-embed-large".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// File tracking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub hash_algorithm: String,
    pub ignore_patterns: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: "sha256".to_string(),
            ignore_patterns: vec![
                "*.tmp".to_string(),
                "*.temp".to_string(),
                "*.part".to_string(),
            ],
        }
    }
}

/// Text window settings for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub window_size: usize,
    pub window_overlap: usize,
    pub min_window_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            window_overlap: 512,
            min_window_size: 64,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Answer post-processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    pub source_marker: String,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            source_marker: "data/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ollama.host, "http://localhost:11434");
        assert_eq!(config.ollama.embedding_model, "mxbai-embed-large");
        assert_eq!(config.chunking.window_size, 1024);
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.ollama.model, deserialized.ollama.model);
        assert_eq!(config.answer.source_marker, deserialized.answer.source_marker);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [ollama]
            model = "mistral"

            [retrieval]
            top_k = 8
            "#
        )
        .unwrap();

        let path = temp_file.path().to_path_buf();
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.retrieval.top_k, 8);
        // Defaults should still apply
        assert_eq!(config.ollama.host, "http://localhost:11434");
    }

    #[test]
    fn test_default_config_string_parses() {
        let config: Config = toml::from_str(&Config::default_config_string()).unwrap();
        assert_eq!(config.files.hash_algorithm, "sha256");
        assert_eq!(config.chunking.window_overlap, 512);
    }
}
