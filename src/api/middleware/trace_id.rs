//! Trace ID 中间件
//! 为每个请求生成唯一的 trace_id，用于全链路追踪

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// 请求扩展中的 trace_id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// 从请求头中提取 trace_id，如果没有则生成新的
pub fn get_or_generate(headers: &HeaderMap) -> String {
    headers
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Trace ID 中间件
/// 写入请求扩展和响应头，并为整个请求开一个 span
pub async fn trace_id_middleware(mut req: Request, next: Next) -> Response {
    let trace_id = get_or_generate(req.headers());
    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let span = tracing::info_span!("request", trace_id = %trace_id);
    let mut response = next.run(req).instrument(span).await;

    if let Ok(header_value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, header_value);
    }

    response
}
