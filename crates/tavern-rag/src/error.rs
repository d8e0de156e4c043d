//! Retrieval error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or querying a rules index.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The embedding service failed or returned an unexpected body.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A rules or index file does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The rules document cannot be indexed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query and index vectors differ in length.
    #[error("Dimension mismatch: query has {query} dimensions, entry '{id}' has {entry}")]
    DimensionMismatch {
        /// Entry identifier.
        id: String,
        /// Query vector length.
        query: usize,
        /// Entry vector length.
        entry: usize,
    },
}

impl RagError {
    /// Create an embedding error.
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure came from talking to the remote service.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Embedding(_))
    }
}
