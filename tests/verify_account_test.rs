//! 账户名解析端到端测试
//!
//! 通过 wiremock 模拟 Flutterwave / Paystack

mod common;

use std::time::Duration;

use axum::{body::Body, http::{Request, StatusCode}};
use common::{build_app, post_json, send, test_config};
use miles_gateway::service::fallback_resolver::FallbackResolver;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const VERIFY: &str = "/api/verify_account";

#[tokio::test]
async fn test_fallback_when_unconfigured() {
    let server = MockServer::start().await;
    let app = build_app(test_config(&server.uri()));

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": "1234567890", "bank_code": "999992"})),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    let expected = FallbackResolver::new().resolve("1234567890", "999992").unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["accountName"], expected.account_name);
    assert_eq!(body["provider"], "OPay (Paycom)");
}

#[tokio::test]
async fn test_invalid_account_number_makes_no_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.credentials.flutterwave_secret_key = Some("FLWSECK_TEST".into());
    let app = build_app(config);

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": "123", "bank_code": "058"})),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let body = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_format");
}

#[tokio::test]
async fn test_primary_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/accounts/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Account details fetched",
            "data": {"account_number": "0123456789", "account_name": "ADAEZE OKAFOR"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.credentials.flutterwave_secret_key = Some("FLWSECK_TEST".into());
    let app = build_app(config);

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": "0123456789", "bank_code": "058"})),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["accountName"], "ADAEZE OKAFOR");
    assert_eq!(body["source"], "primary");
    assert_eq!(body["provider"], "flutterwave");
}

#[tokio::test]
async fn test_primary_http_error_on_standard_bank() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/accounts/resolve"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.credentials.flutterwave_secret_key = Some("FLWSECK_TEST".into());
    let app = build_app(config);

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": "1234567890", "bank_code": "058"})),
    )
    .await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "verification_failed");
    assert!(!resp.text().contains("exploded"));
}

#[tokio::test]
async fn test_primary_timeout_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "data": {"account_name": "LATE"}}))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.upstream.timeout_ms = 200;
    config.credentials.flutterwave_secret_key = Some("FLWSECK_TEST".into());
    let app = build_app(config);

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": "1234567890", "bank_code": "999991"})),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    let expected = FallbackResolver::new().resolve("1234567890", "999991").unwrap();
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["accountName"], expected.account_name);
    assert_eq!(body["provider"], "PalmPay");
}

#[tokio::test]
async fn test_paystack_backup_after_flutterwave_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/accounts/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "Cannot resolve account"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bank/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": {"account_name": "CHINEDU EZE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.credentials.flutterwave_secret_key = Some("FLWSECK_TEST".into());
    config.credentials.paystack_secret_key = Some("sk_test".into());
    let app = build_app(config);

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": "0123456789", "bank_code": "044"})),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["accountName"], "CHINEDU EZE");
    assert_eq!(body["provider"], "paystack");
}

#[tokio::test]
async fn test_unconfigured_standard_bank_is_unavailable() {
    let server = MockServer::start().await;
    let app = build_app(test_config(&server.uri()));

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": "1234567890", "bank_code": "058"})),
    )
    .await;

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.json()["code"], "service_unavailable");
}

#[tokio::test]
async fn test_missing_fields_and_invalid_json() {
    let server = MockServer::start().await;
    let app = build_app(test_config(&server.uri()));

    let resp = send(&app, post_json(VERIFY, json!({"account_number": "1234567890"}))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json()["error"],
        "Missing required fields: account_number and bank_code"
    );

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": "  ", "bank_code": "058"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json()["error"],
        "Account number and bank code cannot be empty"
    );

    let request = Request::builder()
        .method("POST")
        .uri(VERIFY)
        .body(Body::from("{not json"))
        .unwrap();
    let resp = send(&app, request).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Invalid JSON in request body");
}

#[tokio::test]
async fn test_numeric_account_number_is_invalid_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = build_app(test_config(&server.uri()));

    let resp = send(
        &app,
        post_json(VERIFY, json!({"account_number": 1234567890, "bank_code": "999992"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let body = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_format");
    assert_eq!(body["error"], "account_number and bank_code must be strings");
    assert!(body["trace_id"].is_string());
}

#[tokio::test]
async fn test_response_carries_trace_and_cors_headers() {
    let server = MockServer::start().await;
    let app = build_app(test_config(&server.uri()));

    let mut request = post_json(VERIFY, json!({"account_number": "1234567890", "bank_code": "50515"}));
    request
        .headers_mut()
        .insert("X-Trace-Id", "trace-abc".parse().unwrap());
    let resp = send(&app, request).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("x-trace-id"), Some("trace-abc"));
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
    assert_eq!(
        resp.header("cache-control"),
        Some("no-cache, no-store, must-revalidate")
    );
    assert_eq!(resp.json()["provider"], "Moniepoint");
}
