//! Splitting a rules document into retrievable chunks.

use crate::rules::RulesDocument;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Chunk metadata, ordered by key so index files are stable.
pub type Metadata = BTreeMap<String, Value>;

/// One retrievable unit of persona or rules text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Identifier, unique within one build.
    pub id: String,

    /// Text that gets embedded and shown to the model.
    pub text: String,

    /// Section, field, and NPC name the chunk came from.
    #[serde(default)]
    pub metadata: Metadata,
}

/// Produce the chunks for a rules document, in document order.
///
/// Persona fields come first (`backstory`, `traits`, `goals`,
/// `dialogue_style`), then safety items, then operational rules. Missing or
/// empty fields produce nothing.
pub fn chunk_rules(doc: &RulesDocument) -> Vec<Chunk> {
    let npc_name = doc.npc_name();
    let mut builder = ChunkList::default();

    if let Some(persona) = &doc.persona {
        if let Some(backstory) = persona.backstory.as_deref().filter(|s| !s.trim().is_empty()) {
            builder.push(
                "persona.backstory",
                format!("NPC {} backstory: {}", npc_name, backstory),
                persona_meta("backstory", npc_name),
            );
        }

        if !persona.traits.is_empty() {
            builder.push(
                "persona.traits",
                format!("NPC {} traits: {}", npc_name, persona.traits.join(", ")),
                persona_meta("traits", npc_name),
            );
        }

        if !persona.goals.is_empty() {
            builder.push(
                "persona.goals",
                format!("NPC {} goals: {}", npc_name, persona.goals.join(", ")),
                persona_meta("goals", npc_name),
            );
        }

        if !persona.dialogue_style.is_empty() {
            let style: Vec<String> = persona
                .dialogue_style
                .iter()
                .map(|(key, value)| format!("{}: {}", key, display_value(value)))
                .collect();
            builder.push(
                "persona.dialogue_style",
                format!("NPC {} dialogue style: {}", npc_name, style.join("; ")),
                persona_meta("dialogue_style", npc_name),
            );
        }
    }

    if let Some(safety) = &doc.safety {
        for (i, item) in safety.refuse.iter().enumerate() {
            let index = i + 1;
            builder.push(
                format!("safety.refuse.{}", index),
                format!("Refuse policy {}: {}", index, item),
                safety_meta("refuse", index, npc_name),
            );
        }

        for (i, item) in safety.deescalation.iter().enumerate() {
            let index = i + 1;
            builder.push(
                format!("safety.deescalation.{}", index),
                format!("De-escalation tip {}: {}", index, item),
                safety_meta("deescalation", index, npc_name),
            );
        }
    }

    for rule in &doc.operational_rules {
        // Unnamed rules are numbered by the chunks emitted before them
        let position = builder.chunks.len();
        let rule_id = rule
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("rule.{}", position));

        let text = format!("Rule {}: {} (tags: {})", rule_id, rule.text, rule.tags.join(", "));

        let mut meta = Metadata::new();
        meta.insert("section".into(), json!("rules"));
        meta.insert("rule_id".into(), json!(rule_id));
        meta.insert("tags".into(), json!(rule.tags));
        meta.insert("npc_name".into(), json!(npc_name));

        builder.push(format!("rules.{}", rule_id), text, meta);
    }

    builder.chunks
}

/// Accumulates chunks while keeping ids unique.
#[derive(Default)]
struct ChunkList {
    chunks: Vec<Chunk>,
    seen: HashSet<String>,
}

impl ChunkList {
    fn push(&mut self, id: impl Into<String>, text: String, metadata: Metadata) {
        let base = id.into();
        let mut id = base.clone();
        let mut n = 2;
        while self.seen.contains(&id) {
            id = format!("{}#{}", base, n);
            n += 1;
        }
        if id != base {
            warn!("Duplicate chunk id '{}' renamed to '{}'", base, id);
        }

        self.seen.insert(id.clone());
        self.chunks.push(Chunk { id, text, metadata });
    }
}

fn persona_meta(field: &str, npc_name: &str) -> Metadata {
    let mut meta = Metadata::new();
    meta.insert("section".into(), json!("persona"));
    meta.insert("field".into(), json!(field));
    meta.insert("npc_name".into(), json!(npc_name));
    meta
}

fn safety_meta(field: &str, index: usize, npc_name: &str) -> Metadata {
    let mut meta = Metadata::new();
    meta.insert("section".into(), json!("safety"));
    meta.insert("field".into(), json!(field));
    meta.insert("index".into(), json!(index));
    meta.insert("npc_name".into(), json!(npc_name));
    meta
}

/// Render a style value without JSON quoting for plain strings.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
