//! Ollama provider for local open-source models.
//!
//! Uses the `/api/generate` endpoint, which takes a single prompt rather than
//! a chat transcript. Ollama must be running locally (default:
//! http://localhost:11434).

use super::{CompletionProvider, FragmentStream, RawCompletion};
use crate::error::CompletionError;
use crate::Result;
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tavern_core::TavernConfig;
use tracing::debug;

/// Ollama completion provider.
pub struct OllamaCompletion {
    /// Base URL for Ollama server.
    base_url: String,

    /// HTTP client.
    client: Client,

    /// Model to use.
    model: String,

    /// Ask the server to constrain output to JSON.
    json_format: bool,
}

impl OllamaCompletion {
    /// Create a provider from the startup configuration.
    pub fn from_config(config: &TavernConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ollama.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            client,
            model: config.ollama.completion_model.clone(),
            json_format: config.npc.json_format,
        })
    }

    /// Set the base URL for Ollama server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Request `format: "json"` from the server.
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Build the API request.
    fn build_request(&self, prompt: &str, temperature: f32, stream: bool) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream,
            temperature,
            format: self.json_format.then(|| "json".to_string()),
        }
    }
}

#[async_trait]
impl CompletionProvider for OllamaCompletion {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<RawCompletion> {
        let request = self.build_request(prompt, temperature, false);

        debug!("Sending request to Ollama API: {}", self.base_url);

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(e, &self.base_url))?;

        let response = check_status(response).await?;

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::malformed(format!("Failed to parse response: {}", e)))?;

        Ok(RawCompletion {
            text: api_response.response,
            model: api_response.model,
            done: api_response.done,
        })
    }

    fn complete_stream(&self, prompt: &str, temperature: f32) -> FragmentStream {
        let request = self.build_request(prompt, temperature, true);
        let client = self.client.clone();
        let endpoint = self.endpoint();
        let base_url = self.base_url.clone();

        Box::pin(stream! {
            debug!("Opening stream to Ollama API: {}", base_url);

            let response = match client.post(&endpoint).json(&request).send().await {
                Ok(r) => r,
                Err(e) => {
                    yield Err(send_error(e, &base_url));
                    return;
                }
            };

            let response = match check_status(response).await {
                Ok(r) => r,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut bytes = response.bytes_stream();
            let mut lines = LineBuffer::default();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(CompletionError::Http(e));
                        return;
                    }
                };

                for line in lines.push(&chunk) {
                    match parse_stream_line(&line) {
                        Ok(Some(fragment)) => yield Ok(fragment),
                        Ok(None) => {}
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }

            // The final line may lack a trailing newline
            match parse_stream_line(&lines.finish()) {
                Ok(Some(fragment)) => yield Ok(fragment),
                Ok(None) => {}
                Err(e) => yield Err(e),
            }
        })
    }
}

fn send_error(e: reqwest::Error, base_url: &str) -> CompletionError {
    if e.is_connect() {
        CompletionError::transport(format!(
            "Cannot connect to Ollama at {}. Is Ollama running?",
            base_url
        ))
    } else {
        CompletionError::Http(e)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(CompletionError::Status { status, body })
}

/// Splits a byte stream into newline-terminated lines.
#[derive(Debug, Default)]
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    /// Append bytes and return every line completed by them.
    fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            lines.push(line);
        }
        lines
    }

    /// Whatever remains after the last newline.
    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Decode one NDJSON line; `None` for blank lines and lines without text.
fn parse_stream_line(line: &[u8]) -> Result<Option<String>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let chunk: ApiStreamChunk = serde_json::from_str(text)
        .map_err(|e| CompletionError::malformed(format!("Invalid stream line: {}", e)))?;
    Ok(chunk.response)
}

// API types

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    prompt: String,
    stream: bool,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ApiStreamChunk {
    #[serde(default)]
    response: Option<String>,
}
