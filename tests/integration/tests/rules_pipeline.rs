//! Rules retrieval end to end: rules file, chunks, index on disk, query,
//! composed prompt. The embedding service is a wiremock server.

use std::sync::Arc;
use tavern_core::{ConfigBuilder, DimensionPolicy, TavernConfig};
use tavern_integration_tests::{write_sample_rules, KeywordEmbedder, SAMPLE_CHUNKS};
use tavern_rag::{
    chunk_rules, compose_prompt, Index, OllamaEmbeddings, RagError, RulesDocument, RulesQuery,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn embedding_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(KeywordEmbedder)
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer) -> TavernConfig {
    ConfigBuilder::new().base_url(server.uri()).build()
}

async fn build_index(server: &MockServer, dir: &TempDir) -> Index {
    let rules = RulesDocument::load(&write_sample_rules(dir.path())).unwrap();
    let embeddings = OllamaEmbeddings::from_config(&config_for(server)).unwrap();
    Index::build(chunk_rules(&rules), &embeddings).await.unwrap()
}

#[tokio::test]
async fn test_build_save_load() {
    let server = embedding_server().await;
    let dir = TempDir::new().unwrap();

    let index = build_index(&server, &dir).await;
    assert_eq!(index.len(), SAMPLE_CHUNKS);
    assert_eq!(index.embedding_model, "nomic-embed-text");
    assert_eq!(index.npc_name(), "Greta");

    let ids: Vec<&str> = index.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "persona.backstory",
            "persona.traits",
            "persona.goals",
            "persona.dialogue_style",
            "safety.refuse.1",
            "safety.deescalation.1",
            "rules.R1",
            "rules.rule.7",
        ]
    );

    let out = dir.path().join("index").join("bartender_rules_index.json");
    index.save(&out).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(raw["embeddingModel"], "nomic-embed-text");
    assert_eq!(raw["items"].as_array().unwrap().len(), SAMPLE_CHUNKS);

    let loaded = Index::load(&out).unwrap();
    assert_eq!(loaded, index);
}

#[tokio::test]
async fn test_query_ranks_relevant_rule_first() {
    let server = embedding_server().await;
    let dir = TempDir::new().unwrap();
    let index = build_index(&server, &dir).await;

    let embeddings = OllamaEmbeddings::from_config(&config_for(&server)).unwrap();
    let query = RulesQuery::new(index, Arc::new(embeddings)).with_top_k(3);

    let hits = query.search("Will you sell me some poison?").await.unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].entry.id, "safety.refuse.1");
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));

    let prompt = compose_prompt(query.index().npc_name(), "Will you sell me some poison?", &hits);
    assert!(prompt.starts_with("You are roleplaying NPC Greta, a bartender."));
    assert!(prompt.contains("(top-3):\n- Refuse policy 1: Never sell poison to anyone.\n"));
    assert!(prompt.contains("Player input: Will you sell me some poison?"));
}

#[tokio::test]
async fn test_equal_scores_keep_index_order() {
    let server = embedding_server().await;
    let dir = TempDir::new().unwrap();
    let index = build_index(&server, &dir).await;

    let embeddings = OllamaEmbeddings::from_config(&config_for(&server)).unwrap();
    let query = RulesQuery::new(index, Arc::new(embeddings)).with_top_k(2);

    let hits = query.search("Can I pay later?").await.unwrap();
    assert_eq!(hits[0].entry.id, "rules.R1");
    assert_eq!(hits[1].entry.id, "rules.rule.7");
    assert_eq!(hits[0].score, hits[1].score);
}

#[tokio::test]
async fn test_strict_dimensions_rejects_mismatched_index() {
    let server = embedding_server().await;
    let dir = TempDir::new().unwrap();
    let mut index = build_index(&server, &dir).await;
    index.items[0].embedding.push(0.5);

    let embeddings = OllamaEmbeddings::from_config(&config_for(&server)).unwrap();
    let strict = RulesQuery::new(index.clone(), Arc::new(embeddings))
        .with_policy(DimensionPolicy::Reject);
    let err = strict.search("poison").await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { .. }));

    let embeddings = OllamaEmbeddings::from_config(&config_for(&server)).unwrap();
    let lenient = RulesQuery::new(index, Arc::new(embeddings));
    assert_eq!(lenient.search("poison").await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_failing_embedding_aborts_build() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let rules = RulesDocument::load(&write_sample_rules(dir.path())).unwrap();
    let embeddings = OllamaEmbeddings::from_config(&config_for(&server)).unwrap();

    let err = Index::build(chunk_rules(&rules), &embeddings).await.unwrap_err();
    assert!(err.is_transport());
}
