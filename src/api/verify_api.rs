//! 银行账户名解析 API
//!
//! POST /api/verify_account

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::middleware::TraceId,
    app_state::AppState,
    domain::{Failure, VerifiedAccount},
    error::AppError,
    metrics,
};

const ENDPOINT: &str = "POST /api/verify_account";

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyAccountRequest {
    /// 10 位账户号
    #[schema(example = "1234567890")]
    pub account_number: Option<String>,
    /// 银行或服务商代码
    #[schema(example = "999992")]
    pub bank_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyAccountResponse {
    pub success: bool,
    #[serde(rename = "accountName")]
    pub account_name: String,
    /// primary：银行确认；fallback：确定性生成，未经银行确认
    #[schema(example = "fallback")]
    pub source: String,
    /// 上游服务名或降级服务商名称
    #[schema(example = "OPay (Paycom)")]
    pub provider: String,
}

impl From<VerifiedAccount> for VerifyAccountResponse {
    fn from(account: VerifiedAccount) -> Self {
        Self {
            success: true,
            account_name: account.account_name,
            source: account.source.as_str().to_string(),
            provider: account.provider,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/verify_account",
    tag = "verification",
    request_body = VerifyAccountRequest,
    responses(
        (status = 200, description = "Account name resolved", body = VerifyAccountResponse),
        (status = 400, description = "Invalid input", body = crate::error_body::ErrorBodyDoc),
        (status = 422, description = "Verification failed", body = crate::error_body::ErrorBodyDoc),
        (status = 503, description = "Verification not configured for this bank", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn verify_account(
    State(st): State<Arc<AppState>>,
    trace_id: Option<Extension<TraceId>>,
    body: Bytes,
) -> Result<Json<VerifyAccountResponse>, AppError> {
    let trace_id = trace_id.map(|Extension(TraceId(id))| id);
    let attach = |err: AppError| match &trace_id {
        Some(id) => err.with_trace_id(id.clone()),
        None => err,
    };

    // 不依赖 Content-Type，直接按 JSON 解析
    let request: VerifyAccountRequest = serde_json::from_slice(&body).map_err(|e| {
        metrics::count_err(ENDPOINT);
        attach(body_error(e))
    })?;

    match st
        .verification
        .verify(request.account_number.as_deref(), request.bank_code.as_deref())
        .await
    {
        Ok(account) => {
            metrics::count_ok(ENDPOINT);
            Ok(Json(account.into()))
        }
        Err(failure) => {
            metrics::count_err(ENDPOINT);
            tracing::info!(kind = %failure.kind, "❌ Account verification failed");
            Err(attach(failure.into()))
        }
    }
}

/// JSON 语法错误 → bad_request；结构正确但字段类型不对 → invalid_format
fn body_error(err: serde_json::Error) -> AppError {
    match err.classify() {
        serde_json::error::Category::Data => {
            Failure::invalid_format("account_number and bank_code must be strings").into()
        }
        _ => AppError::from(err),
    }
}
