//! 测试辅助模块
//! 提供测试配置、应用构建和请求发送

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use miles_gateway::{
    api,
    app_state::AppState,
    config::{
        Config, CredentialsConfig, LoggingConfig, RateLimitConfig, ServerConfig, UpstreamConfig,
    },
};
use tower::ServiceExt;

/// 所有上游指向同一个 mock 地址，凭证默认全部未配置
pub fn test_config(upstream_base: &str) -> Config {
    Config {
        server: ServerConfig {
            bind_addr: "127.0.0.1:0".into(),
            static_dir: ".".into(),
        },
        logging: LoggingConfig {
            level: "info".into(),
            format: "text".into(),
        },
        upstream: UpstreamConfig {
            timeout_ms: 2_000,
            flutterwave_base_url: upstream_base.into(),
            paystack_base_url: upstream_base.into(),
            etherscan_base_url: upstream_base.into(),
            banks_country: "NG".into(),
        },
        credentials: CredentialsConfig {
            flutterwave_secret_key: None,
            paystack_secret_key: None,
            etherscan_api_key: None,
        },
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: 1_000,
        },
    }
}

pub fn build_app(config: Config) -> Router {
    let state = AppState::new(Arc::new(config)).expect("failed to build app state");
    api::routes(Arc::new(state))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body")
        .to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}
