//! End-to-end pipeline tests against a mock metadata server and model endpoint.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use worldpulse::config::Config;
use worldpulse::server::AppState;

const TOKEN_PATH: &str = "/token";

fn model_path(model: &str) -> String {
    format!("/v1/projects/test-project/locations/test-region/publishers/google/models/{model}:generateContent")
}

fn config_for(server: &MockServer, candidates: &[&str]) -> Config {
    let mut config = Config::default();
    config.vertex.project_id = "test-project".to_string();
    config.vertex.location = "test-region".to_string();
    config.vertex.base_url = Some(server.uri());
    config.vertex.token_url = format!("{}{}", server.uri(), TOKEN_PATH);
    config.vertex.model_candidates = candidates.iter().map(|c| c.to_string()).collect();
    config.vertex.max_retries = 1;
    config.image.enabled = false;
    config
}

fn model_reply(inner: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": inner.to_string()}]}
        }]
    })
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(TOKEN_PATH))
        .and(header("Metadata-Flavor", "Google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc123"})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_country_round_trip() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path(model_path("flash")))
        .and(header("authorization", "Bearer abc123"))
        .and(body_partial_json(json!({
            "generation_config": {"response_mime_type": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(json!({
            "country": "Kenya",
            "topic": "drought",
            "sentiment_score": -0.6,
            "summary": "Crop losses are widespread.",
            "keywords": ["crops", "water", "aid"]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let state = AppState::from_config(&config_for(&server, &["flash"])).unwrap();
    let result = state.service.analyze_country("drought", "Kenya").await.unwrap();

    assert_eq!(result.country_key, "Kenya");
    assert_eq!(result.sentiment_score, -0.6);
    assert_eq!(result.keywords, vec!["crops", "water", "aid"]);
    assert!(!result.is_degraded());
}

#[tokio::test]
async fn test_falls_back_when_first_model_errors() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path(model_path("primary")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": {"code": 404}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(model_path("secondary")))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(json!({
            "sentiment_score": 0.3,
            "summary": "Steady.",
            "keywords": ["a", "b", "c"]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let state = AppState::from_config(&config_for(&server, &["primary", "secondary"])).unwrap();
    let result = state.service.analyze_country("trade", "Singapore").await.unwrap();
    assert_eq!(result.sentiment_score, 0.3);
}

#[tokio::test]
async fn test_batch_survives_total_outage() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(6)
        .mount(&server)
        .await;

    let state = AppState::from_config(&config_for(&server, &["m1", "m2", "m3"])).unwrap();
    let keys = vec!["USA".to_string(), "Canada".to_string()];
    let results = state.service.fan_out("energy", &keys, 8).await.unwrap();

    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(result.is_degraded());
        assert_eq!(result.keywords, vec!["API_FAILURE", "NO_DATA", "SYSTEM_ERROR"]);
        assert!(result.summary.contains("500"));
    }
}

#[tokio::test]
async fn test_token_failure_degrades_without_model_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = AppState::from_config(&config_for(&server, &["m1"])).unwrap();
    let result = state.service.analyze_country("energy", "Norway").await.unwrap();

    assert!(result.is_degraded());
    assert!(result.summary.contains("Authentication error"));
}
