//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use crate::types::UploadFile;
use pretty_assertions::assert_eq;
use reqwest::Method;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.base_url, "http://localhost:8000");
    assert!(config.timeout.is_none());
    assert!(config.default_headers.is_empty());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://api.example.com");
    assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("page", 1)
        .query("limit", 10)
        .header("X-Request-Id", "abc123")
        .json(serde_json::json!({"key": "value"}))
        .timeout(Duration::from_secs(10));

    assert_eq!(
        config.query,
        vec![
            ("page".to_string(), "1".to_string()),
            ("limit".to_string(), "10".to_string())
        ]
    );
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert!(matches!(config.body, Some(RequestBody::Json(_))));
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
}

#[test]
fn test_with_config_rejects_bad_base_url() {
    let config = HttpClientConfig::builder().base_url("not a url").build();
    assert!(matches!(
        HttpClient::with_config(config),
        Err(Error::InvalidUrl(_))
    ));

    let config = HttpClientConfig::builder()
        .base_url("mailto:someone@example.com")
        .build();
    assert!(matches!(
        HttpClient::with_config(config),
        Err(Error::Config { .. })
    ));
}

#[test_case("http://localhost:8000", &["api", "stars"], "http://localhost:8000/api/stars" ; "root base")]
#[test_case("http://localhost:8000/", &["api", "stars"], "http://localhost:8000/api/stars" ; "trailing slash")]
#[test_case("https://example.com/gallery/", &["api", "stars", "42"], "https://example.com/gallery/api/stars/42" ; "prefixed base")]
#[test_case("http://localhost:8000", &["api", "stars", "a/b c"], "http://localhost:8000/api/stars/a%2Fb%20c" ; "encoded id")]
fn test_endpoint(base: &str, segments: &[&str], expected: &str) {
    let client =
        HttpClient::with_config(HttpClientConfig::builder().base_url(base).build()).unwrap();
    assert_eq!(client.endpoint(segments).as_str(), expected);
}

#[tokio::test]
async fn test_get_json_with_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stars"))
        .and(query_param("search", "iu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "1", "name": "IU"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let url = client.endpoint(&["api", "stars"]);
    let data: serde_json::Value = client
        .get_json_with_config(url, RequestConfig::new().query("search", "iu"))
        .await
        .unwrap();

    assert_eq!(data[0]["name"], "IU");
}

#[tokio::test]
async fn test_default_and_request_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("X-Client", "tests"))
        .and(header("X-Request-Id", "r1"))
        .and(header("User-Agent", "gallery-tests/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Client", "tests")
        .user_agent("gallery-tests/0.1")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .request(
            Method::GET,
            client.endpoint(&["ping"]),
            RequestConfig::new().header("X-Request-Id", "r1"),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_post_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/stars"))
        .and(body_json(serde_json::json!({"name": "Jisoo"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "abc",
            "name": "Jisoo"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created: serde_json::Value = client
        .post_json(
            client.endpoint(&["api", "stars"]),
            serde_json::json!({"name": "Jisoo"}),
        )
        .await
        .unwrap();
    assert_eq!(created["id"], "abc");
}

#[tokio::test]
async fn test_delete_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/stars/abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .delete(client.endpoint(&["api", "stars", "abc"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_status_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(serde_json::json!({"detail": "maintenance"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_json::<serde_json::Value>(client.endpoint(&["api", "flaky"]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.detail(), Some("maintenance"));
}

#[tokio::test]
async fn test_not_found_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stars/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Star does not exist"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_json::<serde_json::Value>(client.endpoint(&["api", "stars", "missing"]))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Star does not exist");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stars"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_json::<Vec<serde_json::Value>>(client.endpoint(&["api", "stars"]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = HttpClientConfig::builder()
        .base_url(format!("http://127.0.0.1:{port}"))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    let err = client
        .get_json::<serde_json::Value>(client.endpoint(&["api", "stars"]))
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert_eq!(err.user_message(), "Cannot reach the backend server");
}

#[tokio::test]
async fn test_multipart_repeats_field_per_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(|req: &Request| {
            let content_type = req
                .headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let body = String::from_utf8_lossy(&req.body).to_string();
            let parts = body.matches("name=\"files\"").count();
            ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "multipart": content_type.starts_with("multipart/form-data"),
                "parts": parts,
                "has_a": body.contains("filename=\"a.png\""),
                "has_b": body.contains("filename=\"b.jpg\""),
            }))
        })
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let files = vec![
        UploadFile::new("a.png", "image/png", vec![1u8, 2, 3]),
        UploadFile::new("b.jpg", "image/jpeg", vec![4u8, 5]),
    ];
    let echoed: serde_json::Value = client
        .request_json(
            Method::POST,
            client.endpoint(&["upload"]),
            RequestConfig::new().multipart("files", files),
        )
        .await
        .unwrap();

    assert_eq!(echoed["multipart"], true);
    assert_eq!(echoed["parts"], 2);
    assert_eq!(echoed["has_a"], true);
    assert_eq!(echoed["has_b"], true);
}

#[tokio::test]
async fn test_multipart_invalid_mime_fails_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let files = vec![UploadFile::new("a.png", "not a mime", vec![1u8])];
    let err = client
        .request(
            Method::POST,
            client.endpoint(&["upload"]),
            RequestConfig::new().multipart("files", files),
        )
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.status(), None);
}
