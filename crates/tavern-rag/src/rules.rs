//! Rules document format.
//!
//! A rules file describes one NPC: persona notes, safety policies, and
//! free-form operational rules. Every section is optional.

use crate::error::RagError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// NPC name used when a rules document does not carry one.
pub const DEFAULT_NPC_NAME: &str = "Bartender";

/// A parsed rules/persona document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesDocument {
    /// Name of the NPC the rules describe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc_name: Option<String>,

    /// Persona notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,

    /// Safety policies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<Safety>,

    /// Operational rules, in document order.
    #[serde(default)]
    pub operational_rules: Vec<OperationalRule>,
}

/// Persona section of a rules document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,

    #[serde(default)]
    pub traits: Vec<String>,

    #[serde(default)]
    pub goals: Vec<String>,

    /// Style attributes, e.g. `tone: gruff`, in file order.
    #[serde(default)]
    pub dialogue_style: serde_json::Map<String, serde_json::Value>,
}

/// Safety section of a rules document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Safety {
    /// Requests the NPC must refuse.
    #[serde(default)]
    pub refuse: Vec<String>,

    /// De-escalation tips.
    #[serde(default)]
    pub deescalation: Vec<String>,
}

/// A single operational rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalRule {
    /// Explicit rule identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Rule text.
    pub text: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl RulesDocument {
    /// Load a rules document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RagError::NotFound(path.to_path_buf()));
        }

        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    /// Parse a rules document from JSON text.
    pub fn parse(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| RagError::config(format!("invalid rules document: {}", e)))
    }

    /// The NPC name, falling back to [`DEFAULT_NPC_NAME`].
    pub fn npc_name(&self) -> &str {
        self.npc_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_NPC_NAME)
    }
}
