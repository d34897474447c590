//! Transport round trip: live HTTP exchanges classified end to end.

use assert2::{check, let_assert};
use bytes::Bytes;
use gavel::{Backend, BackendResponse, Method, NAMESPACE, StatusError, StatusHandler};
use http_body_util::Full;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn fetch(server: &MockServer, route: &str) -> BackendResponse {
    let client: Client<_, Full<Bytes>> = Client::builder(TokioExecutor::new()).build_http();

    let uri = format!("{}{route}", server.uri());
    let request = http::Request::builder()
        .method(http::Method::GET)
        .uri(uri.as_str())
        .body(Full::default())
        .expect("build request");

    let response = client.request(request).await.expect("send request");
    BackendResponse::from_http(response).with_url(Url::parse(&uri).expect("parse url"))
}

#[tokio::test]
async fn test_accepted_upstream_passes_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Alice"})))
        .mount(&mock_server)
        .await;

    let backend = Backend::new(Method::GET, "/users/{id}");
    let handler = StatusHandler::for_backend(&backend);

    let response = fetch(&mock_server, "/users/1").await;
    let_assert!(Ok(mut response) = handler.classify(response).await);

    check!(response.status() == 200);
    check!(response.header("content-type") == Some("application/json"));

    let body = response.read_body().await.expect("read body");
    let user: serde_json::Value = serde_json::from_slice(&body).expect("parse body");
    check!(user == json!({"id": 1, "name": "Alice"}));
}

#[tokio::test]
async fn test_rejected_upstream_is_captured_with_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("upstream exploded", "text/plain"))
        .mount(&mock_server)
        .await;

    let backend = Backend::new(Method::GET, "/boom")
        .with_extra_config(NAMESPACE, json!({"return_error_details": "flaky-backend"}));
    let handler = StatusHandler::for_backend(&backend);

    let response = fetch(&mock_server, "/boom").await;
    let_assert!(Err(rejection) = handler.classify(response).await);

    let_assert!(StatusError::NamedResponse(record) = rejection.error());
    check!(record.name() == "flaky-backend");
    check!(record.status_code() == 500);
    check!(record.body() == "upstream exploded");
    check!(record.encoding() == "text/plain");

    // The response that crossed the wire is still readable after the capture.
    let_assert!(Some(mut preserved) = rejection.into_response());
    let body = preserved.read_body().await.expect("read body");
    check!(body == Bytes::from("upstream exploded"));
}

#[tokio::test]
async fn test_rejected_upstream_without_details_keeps_the_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let backend = Backend::new(Method::GET, "/missing");
    let handler = StatusHandler::for_backend(&backend);

    let response = fetch(&mock_server, "/missing").await;
    let_assert!(Err(rejection) = handler.classify(response).await);

    let message = rejection.to_string();
    check!(message.starts_with("invalid status code 404 [GET /missing]:"));
    check!(message.ends_with("/missing"));
    check!(rejection.response().is_none());
}
