//! NPC dialogue end to end against a mock `/api/generate` endpoint.

use serde_json::json;
use std::sync::Arc;
use tavern_core::ConfigBuilder;
use tavern_dialogue::{CompletionError, DialogueOutcome, NpcDirector, NpcProfile, OllamaCompletion};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Stream a reply and keep every fragment the director hands out.
async fn collect_fragments(
    director: &NpcDirector,
    npc: &NpcProfile,
    situation: &str,
) -> (Vec<String>, tavern_dialogue::Result<DialogueOutcome>) {
    let mut fragments = Vec::new();
    let outcome = director
        .respond_streaming(npc, situation, None, |f| fragments.push(f.to_string()))
        .await;
    (fragments, outcome)
}

fn director_for(server: &MockServer) -> NpcDirector {
    let config = ConfigBuilder::new().base_url(server.uri()).build();
    let provider = OllamaCompletion::from_config(&config).unwrap();
    NpcDirector::new(Arc::new(provider)).with_temperature(config.npc.temperature)
}

#[tokio::test]
async fn test_structured_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "llama2", "stream": false})))
        .and(body_string_contains("Current Situation: Any rooms tonight?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama2",
            "response": "{\"dialogue\":\"Two silver, up front.\",\"actions\":\"taps the ledger\",\"emotion\":\"wary\",\"decision\":\"wait for payment\"}",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = director_for(&server)
        .respond(&NpcProfile::default(), "Any rooms tonight?", None)
        .await
        .unwrap();

    let reply = outcome.structured().unwrap();
    assert_eq!(reply.dialogue, "Two silver, up front.");
    assert_eq!(reply.actions, "taps the ledger");
    assert_eq!(reply.emotion, "wary");
    assert_eq!(reply.decision, "wait for payment");
}

#[tokio::test]
async fn test_plain_text_reply_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "*grunts* What do you want?",
            "done": true
        })))
        .mount(&server)
        .await;

    let outcome = director_for(&server)
        .respond(&NpcProfile::default(), "Hello", None)
        .await
        .unwrap();

    assert!(outcome.is_fallback());
    assert_eq!(outcome.dialogue(), "*grunts* What do you want?");
}

#[tokio::test]
async fn test_streamed_reply() {
    let server = MockServer::start().await;
    let body = concat!(
        "{\"response\":\"{\\\"dialogue\\\": \",\"done\":false}\n",
        "{\"response\":\"\\\"Mind the step.\\\"}\",\"done\":false}\n",
        "{\"done\":true}\n"
    );
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let director = director_for(&server);
    let (fragments, outcome) =
        collect_fragments(&director, &NpcProfile::default(), "I trip on the way in").await;

    assert_eq!(fragments.len(), 2);
    assert_eq!(outcome.unwrap().dialogue(), "Mind the step.");
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = director_for(&server)
        .respond(&NpcProfile::default(), "Hello", None)
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Status { status: 503, .. }));
    assert!(err.user_message().contains("503"));
}
