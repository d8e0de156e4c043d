//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use std::path::Path;
use tavern_core::{DimensionPolicy, TavernConfig};
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tavern.json5");

    let config = TavernConfig::default();
    config.save(&path).unwrap();

    let loaded = TavernConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("tavern.json5");

    let mut config = TavernConfig::default();
    config.npc.name = "Greta".into();
    config.npc.context = Some("Market day".into());
    config.rag.top_k = 3;
    config.rag.dimension_policy = DimensionPolicy::Reject;
    config.save(&path).unwrap();

    let loaded = TavernConfig::load(&path).unwrap();
    assert_eq!(loaded.npc.name, "Greta");
    assert_eq!(loaded.npc.context.as_deref(), Some("Market day"));
    assert_eq!(loaded.rag.top_k, 3);
    assert_eq!(loaded.rag.dimension_policy, DimensionPolicy::Reject);
}

#[test]
fn test_hand_written_json5() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tavern.json5");
    std::fs::write(
        &path,
        r#"{
            // local GPU box
            ollama: { base_url: "http://gpu-box:11434/", completion_model: "mistral" },
            npc: { temperature: 0.3, },
        }"#,
    )
    .unwrap();

    let config = TavernConfig::load(&path).unwrap();
    assert_eq!(config.base_url(), "http://gpu-box:11434");
    assert_eq!(config.ollama.completion_model, "mistral");
    assert_eq!(config.ollama.embed_model, "nomic-embed-text");
    assert_eq!(config.npc.temperature, 0.3);
    assert_eq!(config.npc.name, "Bob the bartender");
}

#[test]
fn test_config_load_nonexistent() {
    let result = TavernConfig::load(Path::new("/nonexistent/tavern.json5"));
    assert!(result.is_err());
}

#[test]
fn test_explicit_path_must_exist() {
    let result = TavernConfig::resolve(Some(Path::new("/nonexistent/tavern.json5")));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = TavernConfig::parse("not valid json");
    assert!(result.is_err());
}
