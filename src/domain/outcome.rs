//! 解析结果与失败分类
//!
//! 账户名解析和余额查询都返回 `Result<_, Failure>`：
//! 成功分支带来源标记，失败分支必须带具体的 [`FailureKind`]。

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::chain::ChainId;

/// 失败类型（稳定、可对外暴露）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidFormat,
    UnsupportedChain,
    NotAFallbackProvider,
    /// 未配置上游且不在降级白名单内
    ServiceUnavailable,
    /// 上游已尝试且降级不可用
    VerificationFailed,
    /// 上游返回业务失败 / 非 2xx / 报文格式错误
    UpstreamRejected,
    TimeoutError,
    TransportError,
    InternalError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidFormat => "invalid_format",
            FailureKind::UnsupportedChain => "unsupported_chain",
            FailureKind::NotAFallbackProvider => "not_a_fallback_provider",
            FailureKind::ServiceUnavailable => "service_unavailable",
            FailureKind::VerificationFailed => "verification_failed",
            FailureKind::UpstreamRejected => "upstream_rejected",
            FailureKind::TimeoutError => "timeout_error",
            FailureKind::TransportError => "transport_error",
            FailureKind::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已分类的失败，`message` 面向调用方，不含上游原文或凭证
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidFormat, message)
    }

    pub fn unsupported_chain(message: impl Into<String>) -> Self {
        Self::new(FailureKind::UnsupportedChain, message)
    }

    pub fn not_a_fallback_provider(provider_code: &str) -> Self {
        Self::new(
            FailureKind::NotAFallbackProvider,
            format!("Provider code {} has no fallback resolution", provider_code),
        )
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ServiceUnavailable, message)
    }

    pub fn verification_failed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::VerificationFailed, message)
    }

    pub fn upstream_rejected(message: impl Into<String>) -> Self {
        Self::new(FailureKind::UpstreamRejected, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::TimeoutError, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::TransportError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InternalError, message)
    }
}

/// 账户名来源。`Fallback` 表示名称是确定性生成的，不是银行确认的，必须透传给调用方。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Primary,
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Primary => "primary",
            Source::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 成功解析的账户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccount {
    pub account_name: String,
    pub source: Source,
    /// 上游服务名（flutterwave / paystack）或降级服务商名称（如 PalmPay）
    pub provider: String,
}

impl VerifiedAccount {
    pub fn primary(account_name: impl Into<String>, upstream: &str) -> Self {
        Self {
            account_name: account_name.into(),
            source: Source::Primary,
            provider: upstream.to_string(),
        }
    }

    pub fn fallback(account_name: impl Into<String>, provider_label: &str) -> Self {
        Self {
            account_name: account_name.into(),
            source: Source::Fallback,
            provider: provider_label.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }
}

pub type VerificationResult = Result<VerifiedAccount, Failure>;

/// 原生币余额
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBalance {
    pub balance: Decimal,
    pub chain: ChainId,
    pub source: &'static str,
}

impl NativeBalance {
    pub fn network_label(&self) -> &'static str {
        self.chain.network_label()
    }
}

pub type BalanceResult = Result<NativeBalance, Failure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display_contains_kind() {
        let failure = Failure::invalid_format("Account number must be 10 digits");
        assert_eq!(
            failure.to_string(),
            "invalid_format: Account number must be 10 digits"
        );
    }

    #[test]
    fn test_verified_account_source() {
        let primary = VerifiedAccount::primary("JOHN DOE", "flutterwave");
        assert!(!primary.is_fallback());
        assert_eq!(primary.source.as_str(), "primary");

        let fallback = VerifiedAccount::fallback("JOY UGOCHI ONYEKACHI", "PalmPay");
        assert!(fallback.is_fallback());
        assert_eq!(serde_json::to_string(&fallback.source).unwrap(), "\"fallback\"");
    }
}
