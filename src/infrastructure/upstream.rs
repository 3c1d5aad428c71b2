//! 上游网关客户端：单次调用 + 硬超时，不做重试
//!
//! 超时通过丢弃请求 future 实现：到期后正在进行的请求被放弃，连接随之释放。
//! 重试/降级由编排层负责。凭证只放在请求头或查询参数里，永远不进日志。

use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::{domain::Failure, infrastructure::log_redact::redact_secrets};

/// 上游调用描述
#[derive(Clone)]
pub struct UpstreamRequest {
    /// 服务名，用于日志与指标
    pub provider: &'static str,
    pub method: Method,
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub bearer_token: Option<String>,
    pub json_body: Option<serde_json::Value>,
}

impl UpstreamRequest {
    pub fn get(provider: &'static str, url: impl Into<String>) -> Self {
        Self {
            provider,
            method: Method::GET,
            url: url.into(),
            query: Vec::new(),
            bearer_token: None,
            json_body: None,
        }
    }

    pub fn post_json(provider: &'static str, url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            provider,
            method: Method::POST,
            url: url.into(),
            query: Vec::new(),
            bearer_token: None,
            json_body: Some(body),
        }
    }

    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }
}

/// 上游原始响应
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// 网关错误：只有超时与传输两类，HTTP 状态码由调用方分类
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout {
        provider: &'static str,
        timeout_ms: u64,
    },
    #[error("{provider} transport error: {detail}")]
    Transport {
        provider: &'static str,
        detail: String,
    },
}

/// 对外只暴露失败类型，不带上游细节
impl From<GatewayError> for Failure {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Timeout { .. } => Failure::timeout("Upstream provider timed out"),
            GatewayError::Transport { .. } => Failure::transport("Upstream provider unreachable"),
        }
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .user_agent(concat!("miles-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, timeout })
    }

    /// 使用默认超时发起调用
    pub async fn call(&self, request: UpstreamRequest) -> Result<RawResponse, GatewayError> {
        self.call_with_timeout(request, self.timeout).await
    }

    pub async fn call_with_timeout(
        &self,
        request: UpstreamRequest,
        timeout: Duration,
    ) -> Result<RawResponse, GatewayError> {
        let provider = request.provider;
        let method = request.method.clone();
        let url = request.url.clone();

        let mut builder = self.http.request(request.method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = request.bearer_token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.json_body.as_ref() {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.bytes().await?.to_vec();
            Ok::<_, reqwest::Error>(RawResponse { status, body })
        };

        let outcome = tokio::time::timeout(timeout, exchange).await;
        let elapsed_ms = start.elapsed().as_millis();

        match outcome {
            Ok(Ok(raw)) => {
                crate::metrics::observe_upstream_latency_ms(provider, elapsed_ms, raw.is_success());
                tracing::debug!(
                    provider,
                    %method,
                    url = %url,
                    status = raw.status.as_u16(),
                    elapsed_ms = %elapsed_ms,
                    "upstream_response"
                );
                Ok(raw)
            }
            Ok(Err(err)) => {
                crate::metrics::observe_upstream_latency_ms(provider, elapsed_ms, false);
                if err.is_timeout() {
                    tracing::warn!(provider, url = %url, elapsed_ms = %elapsed_ms, "⚠️ upstream connect timed out");
                    return Err(GatewayError::Timeout {
                        provider,
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                let detail = redact_secrets(&err.without_url().to_string());
                tracing::warn!(provider, url = %url, error = %detail, "⚠️ upstream transport error");
                Err(GatewayError::Transport { provider, detail })
            }
            Err(_) => {
                crate::metrics::observe_upstream_latency_ms(provider, elapsed_ms, false);
                tracing::warn!(provider, url = %url, elapsed_ms = %elapsed_ms, "⚠️ upstream call abandoned after timeout");
                Err(GatewayError::Timeout {
                    provider,
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }
}
