//! Integration tests for the HTTP inference backend with Wiremock

use location_resolver::adapters::outbound::{HttpInferenceBackend, HttpInferenceConfig};
use location_resolver::domain::ports::InferenceError;
use location_resolver::{InferenceBackend, LocationExtractor, PlaceName};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpInferenceBackend {
    HttpInferenceBackend::new(HttpInferenceConfig {
        url: format!("{}/generate", server.uri()),
        max_new_tokens: 32,
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

/// Test request body and object response
#[tokio::test]
async fn test_generate_object_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_partial_json(serde_json::json!({
            "inputs": "Tweet: hi\nLocation:",
            "parameters": {"max_new_tokens": 32}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"generated_text": "Paris, France"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = backend(&mock_server).infer("Tweet: hi\nLocation:").await.unwrap();
    assert_eq!(text, "Paris, France");
}

/// Test array response
#[tokio::test]
async fn test_generate_array_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"generated_text": " Unknown "}])),
        )
        .mount(&mock_server)
        .await;

    let text = backend(&mock_server).infer("prompt").await.unwrap();
    assert_eq!(text, " Unknown ");
}

/// Test empty array response
#[tokio::test]
async fn test_generate_empty_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let err = backend(&mock_server).infer("prompt").await.unwrap_err();
    assert!(matches!(err, InferenceError::Decode(_)));
}

/// Test non-2xx responses
#[tokio::test]
async fn test_generate_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = backend(&mock_server).infer("prompt").await.unwrap_err();
    assert!(matches!(err, InferenceError::Status(500)));
}

/// Test the extractor end to end over HTTP
#[tokio::test]
async fn test_extractor_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"generated_text": "\"Denver, Colorado\"\n"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let extractor = LocationExtractor::new(Arc::new(backend(&mock_server)));
    let place = extractor
        .extract("Hiking near the Rockies", "Denver, CO")
        .await
        .unwrap();

    assert_eq!(place, PlaceName::Canonical("Denver, Colorado".to_string()));
}
