//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main tavern configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TavernConfig {
    /// Ollama service settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// NPC used by the dialogue loop.
    #[serde(default)]
    pub npc: NpcConfig,

    /// Rules index settings.
    #[serde(default)]
    pub rag: RagConfig,
}

/// Connection settings for the Ollama-compatible service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL, without a trailing `/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for text completion.
    #[serde(default = "default_completion_model")]
    pub completion_model: String,

    /// Model used for embeddings.
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Upper bound on a single HTTP request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            completion_model: default_completion_model(),
            embed_model: default_embed_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_completion_model() -> String {
    "llama2".to_string()
}

fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// NPC profile and sampling settings for the dialogue loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcConfig {
    /// Display name of the NPC.
    #[serde(default = "default_npc_name")]
    pub name: String,

    /// Personality description embedded in the prompt.
    #[serde(default = "default_personality")]
    pub personality: String,

    /// Player action reported alongside every line of input.
    #[serde(default = "default_player_action")]
    pub player_action: String,

    /// Extra context appended to every prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Sampling temperature (0.0 - 2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Print fragments as they arrive.
    #[serde(default)]
    pub stream: bool,

    /// Ask the service to constrain output to JSON.
    #[serde(default)]
    pub json_format: bool,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            name: default_npc_name(),
            personality: default_personality(),
            player_action: default_player_action(),
            context: None,
            temperature: default_temperature(),
            stream: false,
            json_format: false,
        }
    }
}

fn default_npc_name() -> String {
    "Bob the bartender".to_string()
}

fn default_personality() -> String {
    "wary".to_string()
}

fn default_player_action() -> String {
    "talk".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

/// Rules index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagConfig {
    /// Rules document read by `tavern build`.
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    /// Index file written by `tavern build` and read by `tavern query`.
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Number of hits returned by a query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// How to compare vectors of different lengths.
    #[serde(default)]
    pub dimension_policy: DimensionPolicy,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            rules_path: default_rules_path(),
            index_path: default_index_path(),
            top_k: default_top_k(),
            dimension_policy: DimensionPolicy::default(),
        }
    }
}

fn default_rules_path() -> PathBuf {
    PathBuf::from("bartender_rules.json")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("bartender_rules_index.json")
}

fn default_top_k() -> usize {
    6
}

/// Behavior when a query vector and an index vector differ in length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionPolicy {
    /// Trim both vectors to the shorter length.
    #[default]
    Truncate,
    /// Fail the query.
    Reject,
}
