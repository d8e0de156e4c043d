//! Embedding generation providers.

use crate::error::RagError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tavern_core::TavernConfig;
use tracing::debug;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Name of the embedding model.
    fn model(&self) -> &str;

    /// Generate the embedding for a single text. One request per call.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Ollama `/api/embeddings` provider.
pub struct OllamaEmbeddings {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaEmbeddings {
    /// Create a provider from the startup configuration.
    pub fn from_config(config: &TavernConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ollama.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            model: config.ollama.embed_model.clone(),
            base_url: config.base_url().to_string(),
        })
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddings {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct Response {
            embedding: Option<Vec<f32>>,
        }

        debug!("Embedding {} chars with {}", text.len(), self.model);

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&Request {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RagError::embedding(format!(
                        "Cannot connect to Ollama at {}. Is Ollama running?",
                        self.base_url
                    ))
                } else {
                    RagError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::embedding(format!("API error {}: {}", status, body)));
        }

        let response: Response = response
            .json()
            .await
            .map_err(|e| RagError::embedding(format!("Failed to parse response: {}", e)))?;

        response
            .embedding
            .ok_or_else(|| RagError::embedding("Response has no embedding field"))
    }
}
