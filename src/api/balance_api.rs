//! 原生币余额 API
//!
//! GET /api/crypto/balance?address=0x..&chainid=1

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::middleware::TraceId, app_state::AppState, domain::Failure, error::AppError, metrics,
};

const ENDPOINT: &str = "GET /api/crypto/balance";

#[derive(Debug, Deserialize, IntoParams)]
pub struct BalanceQuery {
    /// EVM 地址（0x + 40 位十六进制）
    pub address: Option<String>,
    /// 链 ID：1 或 56
    pub chainid: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub success: bool,
    /// 十进制字符串，单位为原生币（ETH / BNB）
    #[schema(example = "1.5")]
    pub balance: String,
    #[schema(example = "Ethereum Mainnet")]
    pub network: String,
    #[schema(example = 1)]
    pub chainid: u64,
    #[schema(example = "etherscan")]
    pub source: String,
}

#[utoipa::path(
    get,
    path = "/api/crypto/balance",
    tag = "balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Native balance", body = BalanceResponse),
        (status = 400, description = "Invalid address or unsupported chain", body = crate::error_body::ErrorBodyDoc),
        (status = 408, description = "Upstream timed out", body = crate::error_body::ErrorBodyDoc),
        (status = 422, description = "Upstream rejected the lookup", body = crate::error_body::ErrorBodyDoc),
        (status = 503, description = "Balance lookup not configured", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn get_balance(
    State(st): State<Arc<AppState>>,
    trace_id: Option<Extension<TraceId>>,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Result<Json<BalanceResponse>, AppError> {
    let trace_id = trace_id.map(|Extension(TraceId(id))| id);
    let attach = |err: AppError| match &trace_id {
        Some(id) => err.with_trace_id(id.clone()),
        None => err,
    };

    // 查询串无法反序列化（如重复的 chainid）时仍返回统一的 JSON 错误体
    let Query(q) = query.map_err(|rejection| {
        metrics::count_err(ENDPOINT);
        tracing::info!("❌ Malformed balance query: {}", rejection.body_text());
        attach(
            Failure::invalid_format("Query must contain address and chainid exactly once").into(),
        )
    })?;

    match st
        .balance
        .native_balance(q.address.as_deref(), q.chainid.as_deref())
        .await
    {
        Ok(balance) => {
            metrics::count_ok(ENDPOINT);
            Ok(Json(BalanceResponse {
                success: true,
                balance: balance.balance.to_string(),
                network: balance.network_label().to_string(),
                chainid: balance.chain.id(),
                source: balance.source.to_string(),
            }))
        }
        Err(failure) => {
            metrics::count_err(ENDPOINT);
            tracing::info!(kind = %failure.kind, "❌ Balance lookup failed");
            Err(attach(failure.into()))
        }
    }
}
