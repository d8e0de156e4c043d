//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Interpret a flag value (`1`, `true`, `yes`, `on`; case-insensitive).
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Environment variable names read at startup.
pub mod vars {
    /// Base URL of the Ollama-compatible service.
    pub const OLLAMA_URL: &str = "OLLAMA_URL";

    /// Completion model used by the dialogue loop.
    pub const OLLAMA_MODEL: &str = "OLLAMA_MODEL";

    /// Embedding model used by the rules index.
    pub const EMBED_MODEL: &str = "EMBED_MODEL";

    /// Number of hits returned by `tavern query`.
    pub const TAVERN_TOP_K: &str = "TAVERN_TOP_K";

    /// Tavern home directory override.
    pub const TAVERN_HOME: &str = "TAVERN_HOME";

    /// Tavern config file override.
    pub const TAVERN_CONFIG: &str = "TAVERN_CONFIG";

    /// Tavern log filter.
    pub const TAVERN_LOG: &str = "TAVERN_LOG";

    /// Stream completions in the dialogue loop.
    pub const TAVERN_STREAM: &str = "TAVERN_STREAM";
}
