//! Flutterwave API客户端
//!
//! - 账户名解析：POST /v3/accounts/resolve
//! - 银行列表：GET /v3/banks/{country}
//!
//! API文档: https://developer.flutterwave.com/reference

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{
    domain::{Failure, VerificationRequest},
    infrastructure::{
        log_redact::redact_account_number,
        upstream::{UpstreamClient, UpstreamRequest},
    },
    service::bank::{non_empty_name, AccountNameProvider, ProviderOutcome},
};

pub const PROVIDER_NAME: &str = "flutterwave";

/// Flutterwave 通用响应信封
#[derive(Debug, Deserialize)]
struct FlutterwaveEnvelope<T> {
    status: String,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct FlutterwaveAccountData {
    #[serde(default)]
    account_name: Option<String>,
}

/// Flutterwave客户端
#[derive(Clone)]
pub struct FlutterwaveClient {
    upstream: UpstreamClient,
    base_url: String,
    secret_key: String,
}

impl FlutterwaveClient {
    pub fn new(upstream: UpstreamClient, base_url: &str, secret_key: &str) -> Self {
        Self {
            upstream,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    /// 获取银行列表（原样透传上游 data 数组）
    pub async fn list_banks(&self, country: &str) -> Result<Vec<serde_json::Value>, Failure> {
        let url = format!("{}/v3/banks/{}", self.base_url, country);
        let request = UpstreamRequest::get(PROVIDER_NAME, url).bearer(&self.secret_key);

        let raw = self.upstream.call(request).await.map_err(Failure::from)?;

        if !raw.is_success() {
            tracing::warn!("⚠️ Flutterwave banks API error: {}", raw.status);
            return Err(Failure::upstream_rejected(format!(
                "Bank directory provider returned HTTP {}",
                raw.status.as_u16()
            )));
        }

        let envelope: FlutterwaveEnvelope<Vec<serde_json::Value>> = raw.json().map_err(|e| {
            tracing::warn!("⚠️ Flutterwave banks response malformed: {}", e);
            Failure::upstream_rejected("Bank directory provider returned a malformed response")
        })?;

        match envelope.data {
            Some(banks) if envelope.status == "success" && !banks.is_empty() => {
                tracing::info!("✅ Fetched {} banks from Flutterwave", banks.len());
                Ok(banks)
            }
            _ => {
                tracing::warn!(
                    "⚠️ Flutterwave banks API returned no data (status={}, message={:?})",
                    envelope.status,
                    envelope.message
                );
                Err(Failure::upstream_rejected("No banks data returned from provider"))
            }
        }
    }
}

#[async_trait]
impl AccountNameProvider for FlutterwaveClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn resolve_account_name(&self, request: &VerificationRequest) -> ProviderOutcome {
        let url = format!("{}/v3/accounts/resolve", self.base_url);
        let payload = json!({
            "account_number": request.account_number(),
            "account_bank": request.provider_code(),
        });

        tracing::info!(
            "🌐 调用Flutterwave解析账户: {} @ {}",
            redact_account_number(request.account_number()),
            request.provider_code()
        );

        let raw = match self
            .upstream
            .call(UpstreamRequest::post_json(PROVIDER_NAME, url, payload).bearer(&self.secret_key))
            .await
        {
            Ok(raw) => raw,
            Err(err) => return ProviderOutcome::Unreachable(err),
        };

        if !raw.is_success() {
            return ProviderOutcome::Rejected(format!("HTTP {}", raw.status.as_u16()));
        }

        let envelope: FlutterwaveEnvelope<FlutterwaveAccountData> = match raw.json() {
            Ok(envelope) => envelope,
            Err(e) => return ProviderOutcome::Rejected(format!("malformed payload: {}", e)),
        };

        if envelope.status != "success" {
            return ProviderOutcome::Rejected(format!(
                "provider status {}: {}",
                envelope.status,
                envelope.message.unwrap_or_default()
            ));
        }

        match non_empty_name(envelope.data.and_then(|d| d.account_name)) {
            Some(name) => ProviderOutcome::Resolved(name),
            None => ProviderOutcome::Rejected("account name not found".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::{domain::FailureKind, utils::input_validator::InputValidator};

    async fn client_for(server: &MockServer) -> FlutterwaveClient {
        let upstream = UpstreamClient::new(Duration::from_secs(2)).unwrap();
        FlutterwaveClient::new(upstream, &server.uri(), "FLWSECK_TEST")
    }

    fn request(code: &str) -> VerificationRequest {
        InputValidator::verification_request(Some("0690000032"), Some(code)).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/accounts/resolve"))
            .and(header("authorization", "Bearer FLWSECK_TEST"))
            .and(body_json(json!({"account_number": "0690000032", "account_bank": "044"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Account details fetched",
                "data": {"account_number": "0690000032", "account_name": "Pastor Bright"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.resolve_account_name(&request("044")).await;
        assert_eq!(outcome, ProviderOutcome::Resolved("Pastor Bright".into()));
    }

    #[tokio::test]
    async fn test_provider_reported_failure_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "message": "Sorry, that account number is invalid",
                "data": null
            })))
            .mount(&server)
            .await;

        let outcome = client_for(&server).await.resolve_account_name(&request("044")).await;
        assert!(matches!(outcome, ProviderOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_empty_name_and_http_error_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"account_name": "   "}
            })))
            .mount(&server)
            .await;
        let outcome = client_for(&server).await.resolve_account_name(&request("044")).await;
        assert!(matches!(outcome, ProviderOutcome::Rejected(_)));

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        let outcome = client_for(&server).await.resolve_account_name(&request("044")).await;
        assert_eq!(outcome, ProviderOutcome::Rejected("HTTP 500".into()));
    }

    #[tokio::test]
    async fn test_list_banks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/banks/NG"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [{"id": 1, "code": "044", "name": "Access Bank"}]
            })))
            .mount(&server)
            .await;

        let banks = client_for(&server).await.list_banks("NG").await.unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0]["code"], "044");
    }

    #[tokio::test]
    async fn test_list_banks_upstream_error_does_not_leak_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key FLWSECK_TEST"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.list_banks("NG").await.unwrap_err();
        assert_eq!(err.kind, FailureKind::UpstreamRejected);
        assert!(!err.message.contains("FLWSECK"));
    }
}
