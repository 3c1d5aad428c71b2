//! 银行列表 API

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{api::middleware::TraceId, app_state::AppState, error::AppError, metrics};

const ENDPOINT: &str = "GET /api/banks";

#[derive(Debug, Serialize, ToSchema)]
pub struct BanksResponse {
    pub success: bool,
    /// 上游银行列表原样返回
    #[schema(value_type = Vec<Object>)]
    pub banks: Vec<serde_json::Value>,
}

#[utoipa::path(
    get,
    path = "/api/banks",
    tag = "banks",
    responses(
        (status = 200, description = "Bank list", body = BanksResponse),
        (status = 422, description = "Upstream returned no banks", body = crate::error_body::ErrorBodyDoc),
        (status = 503, description = "Bank list not configured", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn list_banks(
    State(st): State<Arc<AppState>>,
    trace_id: Option<Extension<TraceId>>,
) -> Result<Json<BanksResponse>, AppError> {
    match st.banks.list_banks().await {
        Ok(banks) => {
            metrics::count_ok(ENDPOINT);
            Ok(Json(BanksResponse {
                success: true,
                banks,
            }))
        }
        Err(failure) => {
            metrics::count_err(ENDPOINT);
            let err = AppError::from(failure);
            Err(match trace_id {
                Some(Extension(TraceId(id))) => err.with_trace_id(id),
                None => err,
            })
        }
    }
}
