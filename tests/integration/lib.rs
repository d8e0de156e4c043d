//! Shared fixtures for the tavern integration tests.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use wiremock::{Request, Respond, ResponseTemplate};

/// A small but complete rules document for a bartender NPC.
pub fn sample_rules() -> Value {
    json!({
        "npc_name": "Greta",
        "persona": {
            "backstory": "Former caravan guard who bought the Rusty Flagon.",
            "traits": ["gruff", "observant"],
            "goals": ["keep the peace"],
            "dialogue_style": {"tone": "curt"}
        },
        "safety": {
            "refuse": ["Never sell poison to anyone."],
            "deescalation": ["Offer water before a fight starts."]
        },
        "operational_rules": [
            {"id": "R1", "text": "No credit for strangers; payment up front.", "tags": ["pay"]},
            {"text": "Rooms cost two silver per night."}
        ]
    })
}

/// Number of chunks [`sample_rules`] produces.
pub const SAMPLE_CHUNKS: usize = 8;

/// Write [`sample_rules`] into `dir` and return the file path.
pub fn write_sample_rules(dir: &Path) -> PathBuf {
    let path = dir.join("bartender_rules.json");
    let data = serde_json::to_string_pretty(&sample_rules()).expect("serialize rules");
    std::fs::write(&path, data).expect("write rules");
    path
}

/// Topic keywords; one embedding dimension per topic.
const TOPICS: [&[&str]; 3] = [
    &["poison", "refuse"],
    &["credit", "pay", "silver"],
    &["fight", "water"],
];

/// Embedding a text would get from [`KeywordEmbedder`].
pub fn keyword_embedding(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    TOPICS
        .iter()
        .map(|words| {
            if words.iter().any(|w| lower.contains(w)) {
                1.0
            } else {
                0.05
            }
        })
        .collect()
}

/// Mock `/api/embeddings` responder that embeds by topic keywords.
pub struct KeywordEmbedder;

impl Respond for KeywordEmbedder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let prompt = body["prompt"].as_str().unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(json!({ "embedding": keyword_embedding(prompt) }))
    }
}
