//! Completion provider integrations.
//!
//! - [`OllamaCompletion`] - `/api/generate` on a local Ollama server

pub mod ollama;

use crate::Result;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Full text returned by a non-streaming completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCompletion {
    /// Generated text.
    pub text: String,

    /// Model that produced the text, when reported.
    pub model: Option<String>,

    /// Whether the service marked generation as finished.
    pub done: bool,
}

impl RawCompletion {
    /// Wrap plain text, e.g. text accumulated from a stream.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            done: true,
        }
    }
}

/// Lazy sequence of text fragments. Finite and not restartable.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Trait for completion providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Get the current model.
    fn model(&self) -> &str;

    /// Generate a response (non-streaming).
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<RawCompletion>;

    /// Generate a response (streaming).
    ///
    /// The request is sent when the stream is first polled; fragments are
    /// yielded as the service produces them.
    fn complete_stream(&self, prompt: &str, temperature: f32) -> FragmentStream;
}

pub use ollama::OllamaCompletion;
