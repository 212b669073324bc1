//! Integration tests for the Nominatim geocoder with Wiremock
//!
//! Tests the search request shape and error mapping using mock servers.

use location_resolver::adapters::outbound::{NominatimConfig, NominatimGeocoder};
use location_resolver::domain::ports::GeocodeError;
use location_resolver::{GeoPoint, GeocodingProvider};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocoder(base_url: String) -> NominatimGeocoder {
    NominatimGeocoder::new(NominatimConfig {
        base_url,
        user_agent: "location-resolver-tests/1.0".to_string(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    })
    .unwrap()
}

/// Test that the request carries the query, format, limit and user agent
#[tokio::test]
async fn test_search_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Paris, France"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", "location-resolver-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "lat": "48.8588897",
                "lon": "2.3200410",
                "display_name": "Paris, Île-de-France, France métropolitaine, France",
                "boundingbox": ["48.8155755", "48.9021560", "2.2241220", "2.4697602"]
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let candidate = geocoder(mock_server.uri())
        .geocode("Paris, France")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(candidate.point, GeoPoint::new(48.8588897, 2.320041));
    let bbox = candidate.bounding_box.unwrap();
    assert_eq!(bbox.north(), 48.902156);
    assert_eq!(bbox.west(), 2.224122);
}

/// Test that only the top result is used
#[tokio::test]
async fn test_search_uses_top_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "42.3554334", "lon": "-71.060511"},
            {"lat": "52.97", "lon": "-0.02"}
        ])))
        .mount(&mock_server)
        .await;

    let candidate = geocoder(mock_server.uri())
        .geocode("Boston")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(candidate.point, GeoPoint::new(42.3554334, -71.060511));
    assert!(candidate.bounding_box.is_none());
}

/// Test that an empty result array is a miss, not an error
#[tokio::test]
async fn test_search_no_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = geocoder(mock_server.uri()).geocode("Atlantis").await.unwrap();
    assert!(result.is_none());
}

/// Test non-2xx responses
#[tokio::test]
async fn test_search_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = geocoder(mock_server.uri()).geocode("Paris").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Status(503)));
}

/// Test that a usage-policy block surfaces as a status error
#[tokio::test]
async fn test_search_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Access blocked"))
        .mount(&mock_server)
        .await;

    let err = geocoder(mock_server.uri()).geocode("Paris").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Status(403)));
}

/// Test malformed bodies
#[tokio::test]
async fn test_search_invalid_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = geocoder(mock_server.uri()).geocode("Paris").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Decode(_)));
}

/// Test timeouts map to transport errors
#[tokio::test]
async fn test_search_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(NominatimConfig {
        base_url: mock_server.uri(),
        timeout: Duration::from_millis(200),
        ..Default::default()
    })
    .unwrap();

    let err = geocoder.geocode("Paris").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Transport(_)));
}

/// Test unreachable servers
#[tokio::test]
async fn test_search_connection_refused() {
    // Nothing listens on port 1
    let err = geocoder("http://127.0.0.1:1".to_string())
        .geocode("Paris")
        .await
        .unwrap_err();
    assert!(matches!(err, GeocodeError::Transport(_)));
}
