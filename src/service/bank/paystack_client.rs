//! Paystack API客户端（备用账户名解析）
//!
//! GET /bank/resolve?account_number=..&bank_code=..
//!
//! API文档: https://paystack.com/docs/api/verification/

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    domain::VerificationRequest,
    infrastructure::{
        log_redact::redact_account_number,
        upstream::{UpstreamClient, UpstreamRequest},
    },
    service::bank::{non_empty_name, AccountNameProvider, ProviderOutcome},
};

pub const PROVIDER_NAME: &str = "paystack";

#[derive(Debug, Deserialize)]
struct PaystackResolveResponse {
    status: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<PaystackAccountData>,
}

#[derive(Debug, Deserialize)]
struct PaystackAccountData {
    #[serde(default)]
    account_name: Option<String>,
}

/// Paystack客户端
#[derive(Clone)]
pub struct PaystackClient {
    upstream: UpstreamClient,
    base_url: String,
    secret_key: String,
}

impl PaystackClient {
    pub fn new(upstream: UpstreamClient, base_url: &str, secret_key: &str) -> Self {
        Self {
            upstream,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }
}

#[async_trait]
impl AccountNameProvider for PaystackClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn resolve_account_name(&self, request: &VerificationRequest) -> ProviderOutcome {
        let url = format!("{}/bank/resolve", self.base_url);
        let upstream_request = UpstreamRequest::get(PROVIDER_NAME, url)
            .query("account_number", request.account_number())
            .query("bank_code", request.provider_code())
            .bearer(&self.secret_key);

        tracing::info!(
            "🌐 调用Paystack解析账户: {} @ {}",
            redact_account_number(request.account_number()),
            request.provider_code()
        );

        let raw = match self.upstream.call(upstream_request).await {
            Ok(raw) => raw,
            Err(err) => return ProviderOutcome::Unreachable(err),
        };

        if !raw.is_success() {
            return ProviderOutcome::Rejected(format!("HTTP {}", raw.status.as_u16()));
        }

        let body: PaystackResolveResponse = match raw.json() {
            Ok(body) => body,
            Err(e) => return ProviderOutcome::Rejected(format!("malformed payload: {}", e)),
        };

        if !body.status {
            return ProviderOutcome::Rejected(format!(
                "provider status false: {}",
                body.message.unwrap_or_default()
            ));
        }

        match non_empty_name(body.data.and_then(|d| d.account_name)) {
            Some(name) => ProviderOutcome::Resolved(name),
            None => ProviderOutcome::Rejected("account name not found".into()),
        }
    }
}
