//! Configuration loading and persistence.

use super::{DimensionPolicy, TavernConfig};
use crate::env::{self, vars};
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

impl TavernConfig {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer; plain JSON is valid JSON5
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the effective configuration at startup.
    ///
    /// An explicit path (from `--config` or `TAVERN_CONFIG`) must exist. Without
    /// one, `~/.tavern/tavern.json5` is used when present and built-in defaults
    /// otherwise. Environment overrides are applied last, then the result is
    /// validated.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path: Option<PathBuf> = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => env::get_var(vars::TAVERN_CONFIG).map(|p| paths::expand_tilde(&p)),
        };

        let mut config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::load(&path)?
            }
            None => match Self::load_default() {
                Ok(config) => config,
                Err(ConfigError::NotFound(path)) => {
                    debug!("No configuration at {}, using defaults", path.display());
                    Self::default()
                }
                Err(e) => return Err(e),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(env::get_var);
    }

    /// Apply overrides using `lookup` to read variables.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(vars::OLLAMA_URL) {
            self.ollama.base_url = url;
        }
        if let Some(model) = lookup(vars::OLLAMA_MODEL) {
            self.ollama.completion_model = model;
        }
        if let Some(model) = lookup(vars::EMBED_MODEL) {
            self.ollama.embed_model = model;
        }
        if let Some(top_k) = lookup(vars::TAVERN_TOP_K).and_then(|v| v.parse().ok()) {
            self.rag.top_k = top_k;
        }
        if let Some(stream) = lookup(vars::TAVERN_STREAM) {
            self.npc.stream = env::parse_bool(&stream);
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let url = self.ollama.base_url.trim();
        if url.is_empty() {
            errors.push("Ollama base_url must not be empty".to_string());
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!(
                "Ollama base_url '{}' must start with http:// or https://",
                url
            ));
        }

        if self.ollama.completion_model.trim().is_empty() {
            errors.push("Completion model must not be empty".to_string());
        }
        if self.ollama.embed_model.trim().is_empty() {
            errors.push("Embedding model must not be empty".to_string());
        }
        if self.ollama.timeout_secs == 0 {
            errors.push("Request timeout must be greater than 0".to_string());
        }

        if !(0.0..=2.0).contains(&self.npc.temperature) {
            errors.push(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.npc.temperature
            ));
        }

        if self.rag.top_k == 0 {
            errors.push("Query top_k must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.ollama.base_url.trim_end_matches('/')
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: TavernConfig,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.ollama.base_url = url.into();
        self
    }

    /// Set the completion model.
    pub fn completion_model(mut self, model: impl Into<String>) -> Self {
        self.config.ollama.completion_model = model.into();
        self
    }

    /// Set the embedding model.
    pub fn embed_model(mut self, model: impl Into<String>) -> Self {
        self.config.ollama.embed_model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.ollama.timeout_secs = secs;
        self
    }

    /// Set the NPC name.
    pub fn npc_name(mut self, name: impl Into<String>) -> Self {
        self.config.npc.name = name.into();
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.npc.temperature = temperature;
        self
    }

    /// Set the number of query hits.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.rag.top_k = top_k;
        self
    }

    /// Set the dimension policy.
    pub fn dimension_policy(mut self, policy: DimensionPolicy) -> Self {
        self.config.rag.dimension_policy = policy;
        self
    }

    /// Build the config.
    pub fn build(self) -> TavernConfig {
        self.config
    }

    /// Build the config, validating it first.
    pub fn build_validated(self) -> Result<TavernConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
