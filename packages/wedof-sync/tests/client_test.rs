//! HTTP-level tests of the Wedof client against a mock server.
//!
//! The client is blocking, so every call runs on the blocking pool while the
//! mock server keeps serving on the async runtime.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use wedof_sync::{ClientConfig, Method, QueryParams, WedofClient, WedofError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_url: &str) -> ClientConfig {
    ClientConfig::new("test-key")
        .with_base_url(base_url)
        .with_min_request_interval(Duration::ZERO)
        .with_timeout_secs(5)
}

fn records(first_id: usize, count: usize) -> Value {
    Value::Array(
        (first_id..first_id + count)
            .map(|id| json!({"id": id, "lastName": format!("Learner {id}")}))
            .collect(),
    )
}

async fn blocking<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

#[tokio::test]
async fn test_request_sends_auth_headers_and_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("x-api-key", "test-key"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server.uri());
    let users = blocking(move || WedofClient::new(&config)?.get_users())
        .await
        .unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1]["lastName"], "Learner 1");
}

#[tokio::test]
async fn test_drain_follows_pages_until_short_page() {
    let server = MockServer::start().await;

    for (page, first_id, count) in [("1", 0, 100), ("2", 100, 100), ("3", 200, 37)] {
        Mock::given(method("GET"))
            .and(path("/api/registrationFolders"))
            .and(query_param("page", page))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": records(first_id, count)})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = config(&server.uri());
    let folders = blocking(move || WedofClient::new(&config)?.get_registration_folders())
        .await
        .unwrap();

    assert_eq!(folders.len(), 237);
    assert_eq!(folders[0]["id"], 0);
    assert_eq!(folders[236]["id"], 236);
}

#[tokio::test]
async fn test_drain_keeps_caller_params_but_overrides_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .and(query_param("state", "inTraining"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server.uri());
    let sessions = blocking(move || {
        let mut params = QueryParams::new();
        params.insert("state".into(), "inTraining".into());
        params.insert("limit".into(), "5".into());
        WedofClient::new(&config)?.drain("/api/sessions", &params)
    })
    .await
    .unwrap();

    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/invoices"))
        .respond_with(ResponseTemplate::new(403).set_body_string("{\"message\":\"forbidden\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server.uri());
    let err = blocking(move || WedofClient::new(&config)?.get_invoices())
        .await
        .unwrap_err();

    match err {
        WedofError::Http { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("forbidden"));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server.uri());
    let err = blocking(move || WedofClient::new(&config)?.get_payments())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_invalid_json_is_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/evaluations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let config = config(&server.uri());
    let err = blocking(move || WedofClient::new(&config)?.get_evaluations())
        .await
        .unwrap_err();

    assert!(matches!(err, WedofError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    // Nothing listens on port 1
    let config = config("http://127.0.0.1:1");
    let err = blocking(move || WedofClient::new(&config)?.get_users())
        .await
        .unwrap_err();

    assert!(matches!(err, WedofError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_low_quota_header_does_not_fail_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/organisms"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-RateLimit-Remaining", "1")
                .set_body_json(json!({"siret": "12345678900011"})),
        )
        .mount(&server)
        .await;

    let config = config(&server.uri());
    let organisms = blocking(move || WedofClient::new(&config)?.get_organisms())
        .await
        .unwrap();

    assert_eq!(organisms.len(), 1);
    assert_eq!(organisms[0]["siret"], "12345678900011");
}

#[tokio::test]
async fn test_requests_respect_minimum_interval() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(3)
        .mount(&server)
        .await;

    let interval = Duration::from_millis(150);
    let config = config(&server.uri()).with_min_request_interval(interval);
    let elapsed = blocking(move || -> wedof_sync::Result<Duration> {
        let client = WedofClient::new(&config)?;
        let start = Instant::now();
        for _ in 0..3 {
            client.request(Method::Post, "/api/activities", &QueryParams::new())?;
        }
        Ok(start.elapsed())
    })
    .await
    .unwrap();

    assert!(elapsed >= interval * 2, "three calls took only {elapsed:?}");
}
