use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::{Failure, FailureKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorCode {
    // HTTP 基础错误码
    BadRequest,
    NotFound,
    RateLimitExceeded,
    Internal,

    // 业务错误码（与 FailureKind 一一对应）
    InvalidFormat,
    UnsupportedChain,
    NotAFallbackProvider,
    ServiceUnavailable,
    VerificationFailed,
    UpstreamRejected,
    Timeout,
    Transport,
}

impl AppErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppErrorCode::BadRequest => "bad_request",
            AppErrorCode::NotFound => "not_found",
            AppErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            AppErrorCode::Internal => "internal_error",

            AppErrorCode::InvalidFormat => "invalid_format",
            AppErrorCode::UnsupportedChain => "unsupported_chain",
            AppErrorCode::NotAFallbackProvider => "not_a_fallback_provider",
            AppErrorCode::ServiceUnavailable => "service_unavailable",
            AppErrorCode::VerificationFailed => "verification_failed",
            AppErrorCode::UpstreamRejected => "upstream_rejected",
            AppErrorCode::Timeout => "timeout_error",
            AppErrorCode::Transport => "transport_error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub message: String,
    pub status: StatusCode,
    pub trace_id: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: &self.message,
            code: self.code.as_str(),
            trace_id: self.trace_id.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    fn with_code(code: AppErrorCode, status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            status,
            trace_id: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(AppErrorCode::BadRequest, StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::with_code(AppErrorCode::NotFound, StatusCode::NOT_FOUND, msg)
    }

    pub fn rate_limit_exceeded(msg: impl Into<String>) -> Self {
        Self::with_code(
            AppErrorCode::RateLimitExceeded,
            StatusCode::TOO_MANY_REQUESTS,
            msg,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::with_code(
            AppErrorCode::ServiceUnavailable,
            StatusCode::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    /// 设置追踪ID
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// FailureKind → HTTP 状态码
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::InvalidFormat | FailureKind::UnsupportedChain => StatusCode::BAD_REQUEST,
        FailureKind::NotAFallbackProvider
        | FailureKind::VerificationFailed
        | FailureKind::UpstreamRejected => StatusCode::UNPROCESSABLE_ENTITY,
        FailureKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::TimeoutError => StatusCode::REQUEST_TIMEOUT,
        FailureKind::TransportError | FailureKind::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Failure> for AppError {
    fn from(failure: Failure) -> Self {
        let code = match failure.kind {
            FailureKind::InvalidFormat => AppErrorCode::InvalidFormat,
            FailureKind::UnsupportedChain => AppErrorCode::UnsupportedChain,
            FailureKind::NotAFallbackProvider => AppErrorCode::NotAFallbackProvider,
            FailureKind::ServiceUnavailable => AppErrorCode::ServiceUnavailable,
            FailureKind::VerificationFailed => AppErrorCode::VerificationFailed,
            FailureKind::UpstreamRejected => AppErrorCode::UpstreamRejected,
            FailureKind::TimeoutError => AppErrorCode::Timeout,
            FailureKind::TransportError => AppErrorCode::Transport,
            FailureKind::InternalError => AppErrorCode::Internal,
        };
        Self::with_code(code, status_for(failure.kind), failure.message)
    }
}

// 从 serde_json 错误转换
impl From<serde_json::Error> for AppError {
    fn from(_: serde_json::Error) -> Self {
        Self::bad_request("Invalid JSON in request body")
    }
}

// 从 anyhow 错误转换（详情只进日志）
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("❌ Internal error: {:#}", err);
        Failure::internal("Internal server error").into()
    }
}
