//! Requests sent through base handles against a mock Airtable server.

use std::time::Duration;

use airtable_api::{Airtable, ClientOptions, Defaults, ErrorKind};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::init_tracing;

fn client_for(server: &MockServer, options: ClientOptions) -> Airtable {
    Airtable::with_defaults(
        options
            .with_api_key("keyINTEGRATION")
            .with_endpoint_url(server.uri()),
        &Defaults::new(),
    )
    .expect("api key was provided")
}

#[tokio::test]
async fn test_list_records_with_headers_and_query() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appInt/Projects"))
        .and(query_param("maxRecords", "2"))
        .and(header("Authorization", "Bearer keyINTEGRATION"))
        .and(header("x-api-version", "0.1.0"))
        .and(header("x-airtable-application-id", "appInt"))
        .and(header("X-Team", "data-eng"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [
                {"id": "rec1", "fields": {"Name": "Alpha"}},
                {"id": "rec2", "fields": {"Name": "Beta"}}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = client_for(
        &mock_server,
        ClientOptions::new().with_custom_header("X-Team", "data-eng"),
    )
    .base("appInt");

    let page: serde_json::Value = base
        .get_json("Projects", &[("maxRecords", "2")])
        .await
        .unwrap();

    assert_eq!(page["records"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_create_record() {
    let mock_server = MockServer::start().await;
    let payload = serde_json::json!({"fields": {"Name": "Gamma"}});

    Mock::given(method("POST"))
        .and(path("/v0/appInt/Projects"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "rec3",
            "fields": {"Name": "Gamma"}
        })))
        .mount(&mock_server)
        .await;

    let base = client_for(&mock_server, ClientOptions::new()).base("appInt");
    let created: serde_json::Value = base.post_json("Projects", &payload).await.unwrap();

    assert_eq!(created["id"], "rec3");
}

#[tokio::test]
async fn test_api_version_major_in_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/appInt/Projects/rec1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "rec1",
            "deleted": true
        })))
        .mount(&mock_server)
        .await;

    let base = client_for(&mock_server, ClientOptions::new().with_api_version("2.0.0"))
        .base("appInt");
    let deleted: serde_json::Value = base.delete("Projects/rec1").await.unwrap();

    assert_eq!(deleted["deleted"], true);
}

#[tokio::test]
async fn test_not_found_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appInt/Missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"type": "TABLE_NOT_FOUND", "message": "Could not find table Missing"}
        })))
        .mount(&mock_server)
        .await;

    let base = client_for(&mock_server, ClientOptions::new()).base("appInt");
    let err = base
        .get_json::<serde_json::Value>("Missing", &[])
        .await
        .unwrap_err();

    match err.kind {
        ErrorKind::Api {
            status,
            ref error_type,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(error_type, "TABLE_NOT_FOUND");
        }
        ref other => panic!("unexpected error kind: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appInt/Projects"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"type": "AUTHENTICATION_REQUIRED", "message": "Authentication required"}
        })))
        .mount(&mock_server)
        .await;

    let base = client_for(&mock_server, ClientOptions::new()).base("appInt");
    let err = base
        .get_json::<serde_json::Value>("Projects", &[])
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_rate_limit_is_reported_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appInt/Projects"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = client_for(
        &mock_server,
        ClientOptions::new().with_no_retry_if_rate_limited(true),
    )
    .base("appInt");

    let err = base
        .get_json::<serde_json::Value>("Projects", &[])
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
    assert!(matches!(err.kind, ErrorKind::RateLimited { no_retry: true, .. }));
}

#[tokio::test]
async fn test_timeout_override_applies_to_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appInt/Slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let airtable = client_for(&mock_server, ClientOptions::new());
    let base = airtable
        .with_request_timeout(Duration::from_millis(100))
        .base("appInt");

    let err = base
        .get_json::<serde_json::Value>("Slow", &[])
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Timeout));
    assert_eq!(airtable.request_timeout(), Duration::from_secs(300));
}
