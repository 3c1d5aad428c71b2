use serde::Serialize;
use utoipa::ToSchema;

/// 错误响应格式（仅用于 OpenAPI 文档，实际序列化见 `AppError`）
#[derive(Serialize, ToSchema)]
pub struct ErrorBodyDoc {
    /// 恒为 false
    pub success: bool,
    /// 面向调用方的错误描述
    pub error: String,
    /// 稳定的错误码，如 `invalid_format`、`verification_failed`
    pub code: String,
    pub trace_id: Option<String>,
}
