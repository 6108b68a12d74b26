//! Whole-stack scenarios against a real HTTP server (`wiremock`): simple
//! POST delivery, GET-with-query marshalling, retry-until-success, and
//! masking surviving decorator composition.

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{
    HttpSender, LoggerDecorator, LoggerOptions, Params, RequestOption, RetryDecorator, RetryPolicy,
    Sender, SenderDefaults,
};

fn params_map(pairs: &[(&str, serde_json::Value)]) -> Params {
    let mut map = serde_json::Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    Params::Map(map)
}

#[tokio::test]
async fn simple_post_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wh"))
        .and(body_json(json!({"event": "user.created"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sender = HttpSender::new(SenderDefaults::default());
    let url = format!("{}/wh", server.uri());

    let response = sender
        .send(
            CancellationToken::new(),
            &url,
            params_map(&[("event", json!("user.created"))]),
            &[],
        )
        .await
        .unwrap();

    assert!(response.is_successful());
}

#[tokio::test]
async fn get_with_map_becomes_query_string_and_sends_no_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("term", "golang"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sender = HttpSender::new(SenderDefaults::default());
    let url = format!("{}/search", server.uri());

    let response = sender
        .send(
            CancellationToken::new(),
            &url,
            params_map(&[("term", json!("golang")), ("limit", json!("10"))]),
            &[RequestOption::Method(http::Method::GET)],
        )
        .await
        .unwrap();

    assert!(response.is_successful());
}

#[tokio::test]
async fn retries_on_503_then_succeeds_against_a_real_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wh"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let base = HttpSender::new(SenderDefaults::default());
    let policy = RetryPolicy::new()
        .with_count(3)
        .with_delay(Duration::from_millis(10))
        .on_status([503]);
    let sender = RetryDecorator::new(base, policy);
    let url = format!("{}/wh", server.uri());

    let response = sender
        .send(CancellationToken::new(), &url, Params::None, &[])
        .await
        .unwrap();

    assert!(response.is_successful());
}

#[traced_test]
#[tokio::test]
async fn masked_fields_survive_through_logger_and_retry_composition() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wh"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let base = HttpSender::new(SenderDefaults::default());
    let logged = LoggerDecorator::new(
        base,
        LoggerOptions::new().masked_fields(["api_key", "password"]),
    );
    let sender = RetryDecorator::new(logged, RetryPolicy::new());
    let url = format!("{}/wh", server.uri());

    let payload = params_map(&[
        ("api_key", json!("secret_api_key_123")),
        ("password", json!("very_secret_password")),
        ("username", json!("john_doe")),
        ("event", json!("user.created")),
    ]);

    let response = sender
        .send(CancellationToken::new(), &url, payload, &[])
        .await
        .unwrap();

    assert!(response.is_successful());
    assert!(logs_contain("john_doe"));
    assert!(logs_contain("user.created"));
    assert!(!logs_contain("secret_api_key_123"));
    assert!(!logs_contain("very_secret_password"));
}
