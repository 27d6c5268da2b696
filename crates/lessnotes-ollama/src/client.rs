//! Ollama HTTP client.

use crate::error::{OllamaError, OllamaResult};
use crate::types::*;
use lessnotes_config::OllamaConfig;
use lessnotes_core::{Embedder, LanguageModel};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retry budget for embed/generate calls.
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 500;

/// Client for interacting with Ollama's API.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    host: String,
    model: String,
    embedding_model: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &OllamaConfig) -> OllamaResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(OllamaError::Http)?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            embedding_model: config.embedding_model.clone(),
            timeout,
        })
    }

    /// Check if Ollama server is available.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.host);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List all available models.
    pub async fn list_models(&self) -> OllamaResult<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.host);
        debug!("Listing models from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(OllamaError::ApiError {
                status,
                message: text,
            });
        }

        let list: ListModelsResponse = response.json().await?;
        Ok(list.models)
    }

    /// Check if a specific model is available.
    pub async fn has_model(&self, model: &str) -> OllamaResult<bool> {
        let models = self.list_models().await?;
        Ok(models
            .iter()
            .any(|m| m.name == model || m.name.starts_with(&format!("{}:", model))))
    }

    /// Generate an embedding for text, retrying transient failures.
    pub async fn embed(&self, model: &str, text: &str) -> OllamaResult<Vec<f32>> {
        let mut attempt = 1;
        loop {
            match self.embed_once(model, text).await {
                Ok(embedding) => return Ok(embedding),
                Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                    let backoff = Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1));
                    warn!(
                        "Embedding attempt {}/{} failed ({}), retrying in {:?}",
                        attempt, MAX_ATTEMPTS, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn embed_once(&self, model: &str, text: &str) -> OllamaResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.host);
        debug!(
            "Generating embedding with model {} for text length {}",
            model,
            text.len()
        );

        let request = EmbeddingRequest {
            model: model.to_string(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            if text.contains("not found") || status.as_u16() == 404 {
                return Err(OllamaError::ModelNotFound {
                    model: model.to_string(),
                });
            }

            return Err(OllamaError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await?;
        Ok(embedding_response.embedding)
    }

    /// Generate text (non-streaming), retrying transient failures.
    pub async fn generate(&self, request: GenerateRequest) -> OllamaResult<GenerateResponse> {
        let mut attempt = 1;
        loop {
            match self.generate_once(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                    let backoff = Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1));
                    warn!(
                        "Generation attempt {}/{} failed ({}), retrying in {:?}",
                        attempt, MAX_ATTEMPTS, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn generate_once(&self, request: &GenerateRequest) -> OllamaResult<GenerateResponse> {
        let url = format!("{}/api/generate", self.host);
        debug!("Generating with model {}", request.model);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            if text.contains("not found") || status.as_u16() == 404 {
                return Err(OllamaError::ModelNotFound {
                    model: request.model.clone(),
                });
            }

            return Err(OllamaError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let generate_response: GenerateResponse = response.json().await?;
        info!(
            "Generated {} tokens with model {}",
            generate_response.eval_count.unwrap_or(0),
            generate_response.model
        );
        Ok(generate_response)
    }

    fn map_request_error(&self, e: reqwest::Error) -> OllamaError {
        if e.is_connect() {
            OllamaError::ServerNotRunning {
                host: self.host.clone(),
            }
        } else if e.is_timeout() {
            OllamaError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            OllamaError::Http(e)
        }
    }
}

impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> lessnotes_core::Result<Vec<f32>> {
        let model = self.embedding_model.clone();
        let embedding = OllamaClient::embed(self, &model, text).await?;
        Ok(embedding)
    }
}

impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> lessnotes_core::Result<String> {
        let request = GenerateRequest::new(&self.model, prompt)
            .with_options(GenerateOptions::new().with_temperature(0.0));
        let response = self.generate(request).await?;
        Ok(response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = OllamaConfig::default();
        let client = OllamaClient::from_config(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_generate_request_builder() {
        let request = GenerateRequest::new("llama3.2", "Hello, world!")
            .with_system("You are a helpful assistant.")
            .with_options(GenerateOptions::new().with_temperature(0.0));

        assert_eq!(request.model, "llama3.2");
        assert_eq!(request.prompt, "Hello, world!");
        assert!(request.system.is_some());
        assert_eq!(request.options.unwrap().temperature, Some(0.0));
    }

    #[test]
    fn test_transient_classification() {
        assert!(OllamaError::Timeout { seconds: 5 }.is_transient());
        assert!(OllamaError::ServerNotRunning {
            host: "h".to_string()
        }
        .is_transient());
        assert!(OllamaError::ApiError {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(!OllamaError::ApiError {
            status: 404,
            message: String::new()
        }
        .is_transient());
        assert!(!OllamaError::ModelNotFound {
            model: "m".to_string()
        }
        .is_transient());
    }
}
