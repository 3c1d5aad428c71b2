//! 银行账户名解析上游客户端
//!
//! 支持的服务商（按优先级）：
//! - Flutterwave（主服务，同时提供银行列表）
//! - Paystack（备用）

pub mod flutterwave_client;
pub mod paystack_client;

use async_trait::async_trait;

pub use flutterwave_client::FlutterwaveClient;
pub use paystack_client::PaystackClient;

use crate::{domain::VerificationRequest, infrastructure::upstream::GatewayError};

/// 单次上游解析的结果分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// HTTP 2xx + 上游报告成功 + 账户名非空
    Resolved(String),
    /// 上游报告失败、HTTP 非 2xx 或报文格式错误
    Rejected(String),
    /// 超时或传输错误
    Unreachable(GatewayError),
}

/// 账户名解析上游
#[async_trait]
pub trait AccountNameProvider: Send + Sync {
    /// 服务名（flutterwave / paystack），对外作为 provider 字段返回
    fn name(&self) -> &'static str;

    /// 发起一次上游调用，不重试
    async fn resolve_account_name(&self, request: &VerificationRequest) -> ProviderOutcome;
}

/// 从上游返回的账户名中取出非空值
pub(crate) fn non_empty_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
