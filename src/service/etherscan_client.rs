//! Etherscan v2 多链余额查询
//!
//! GET {base}/v2/api?chainid=..&module=account&action=balance&address=..&tag=latest&apikey=..
//! 返回值单位为 wei，换算为 18 位小数的原生币余额。

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    domain::{BalanceRequest, BalanceResult, Failure, NativeBalance},
    infrastructure::{
        log_redact::redact_address,
        upstream::{UpstreamClient, UpstreamRequest},
    },
};

pub const PROVIDER_NAME: &str = "etherscan";

/// 原生币精度（ETH / BNB 均为 18）
const NATIVE_DECIMALS: u32 = 18;

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Clone)]
pub struct EtherscanClient {
    upstream: UpstreamClient,
    base_url: String,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(upstream: UpstreamClient, base_url: &str, api_key: &str) -> Self {
        Self {
            upstream,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// 查询原生币余额，单次调用，失败即终止
    pub async fn native_balance(&self, request: &BalanceRequest) -> BalanceResult {
        let chain = request.chain();
        let url = format!("{}/v2/api", self.base_url);
        let upstream_request = UpstreamRequest::get(PROVIDER_NAME, url)
            .query("chainid", chain.id().to_string())
            .query("module", "account")
            .query("action", "balance")
            .query("address", request.address())
            .query("tag", "latest")
            .query("apikey", self.api_key.as_str());

        tracing::info!(
            "🌐 查询{}余额: {} on {}",
            chain.native_symbol(),
            redact_address(request.address()),
            chain
        );

        let raw = self.upstream.call(upstream_request).await?;

        if !raw.is_success() {
            tracing::warn!("⚠️ Etherscan HTTP error: {}", raw.status);
            return Err(Failure::upstream_rejected(format!(
                "Balance provider returned HTTP {}",
                raw.status.as_u16()
            )));
        }

        let body: EtherscanResponse = raw.json().map_err(|e| {
            tracing::warn!("⚠️ Etherscan response malformed: {}", e);
            Failure::upstream_rejected("Balance provider returned a malformed response")
        })?;

        if body.status != "1" {
            tracing::warn!(
                "⚠️ Etherscan reported failure: status={} message={:?}",
                body.status,
                body.message
            );
            return Err(Failure::upstream_rejected(
                "Balance provider could not return a balance for this address",
            ));
        }

        let balance = body
            .result
            .as_str()
            .ok_or_else(|| Failure::upstream_rejected("Balance provider returned no balance"))
            .and_then(wei_to_native)?;

        Ok(NativeBalance {
            balance,
            chain,
            source: PROVIDER_NAME,
        })
    }
}

/// wei 字符串 → 原生币余额（去掉末尾多余的 0）
pub fn wei_to_native(wei: &str) -> Result<Decimal, Failure> {
    let wei: u128 = wei
        .trim()
        .parse()
        .map_err(|_| Failure::upstream_rejected("Balance provider returned a non-numeric balance"))?;
    let wei = i128::try_from(wei)
        .map_err(|_| Failure::upstream_rejected("Balance out of range"))?;

    Decimal::try_from_i128_with_scale(wei, NATIVE_DECIMALS)
        .map(|d| d.normalize())
        .map_err(|_| Failure::upstream_rejected("Balance out of range"))
}
