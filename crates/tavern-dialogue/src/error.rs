//! Completion error types.

use thiserror::Error;

/// Errors that can occur while talking to the completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("API error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The service answered with a body that is not the expected envelope.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a malformed-response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Short reason suitable for showing to a player.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "the request timed out".to_string(),
            Self::Http(e) if e.is_connect() => "cannot reach the model service".to_string(),
            Self::Http(_) => "the request failed".to_string(),
            Self::Transport(msg) => msg.clone(),
            Self::Status { status, .. } => format!("the model service returned status {}", status),
            Self::Malformed(_) => "the model service sent an unreadable reply".to_string(),
        }
    }
}
