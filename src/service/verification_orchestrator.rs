//! 账户名解析编排器
//!
//! 状态流转：
//! ```text
//! Validating → PrimaryAttempt → (Success | FallbackAttempt) → (Success | Failed)
//! ```
//! - 每个已配置的上游只调用一次（超时由网关客户端保证），不重试
//! - 没有配置任何上游时直接进入降级
//! - 降级结果必须带 `source=fallback`

use std::sync::Arc;

use crate::{
    domain::{
        Failure, ProviderClass, VerificationRequest, VerificationResult, VerifiedAccount,
    },
    infrastructure::{log_redact::redact_account_number, upstream::GatewayError},
    metrics,
    service::{
        bank::{AccountNameProvider, ProviderOutcome},
        fallback_resolver::FallbackResolver,
    },
    utils::input_validator::InputValidator,
};

/// 编排状态
enum Stage {
    Validating,
    PrimaryAttempt(VerificationRequest),
    FallbackAttempt {
        request: VerificationRequest,
        primary_attempted: bool,
    },
    Done(VerificationResult),
}

pub struct VerificationOrchestrator {
    /// 按优先级排列的上游
    primary: Vec<Arc<dyn AccountNameProvider>>,
    fallback: FallbackResolver,
}

impl VerificationOrchestrator {
    pub fn new(primary: Vec<Arc<dyn AccountNameProvider>>, fallback: FallbackResolver) -> Self {
        Self { primary, fallback }
    }

    pub fn has_primary(&self) -> bool {
        !self.primary.is_empty()
    }

    /// 已配置的上游名称（按优先级）
    pub fn primary_names(&self) -> Vec<&'static str> {
        self.primary.iter().map(|p| p.name()).collect()
    }

    /// 解析账户名
    pub async fn verify(
        &self,
        account_number: Option<&str>,
        bank_code: Option<&str>,
    ) -> VerificationResult {
        let mut stage = Stage::Validating;

        loop {
            stage = match stage {
                Stage::Validating => {
                    match InputValidator::verification_request(account_number, bank_code) {
                        Ok(request) if self.has_primary() => Stage::PrimaryAttempt(request),
                        Ok(request) => {
                            tracing::info!("ℹ️ 未配置上游凭证，直接进入降级解析");
                            Stage::FallbackAttempt {
                                request,
                                primary_attempted: false,
                            }
                        }
                        Err(failure) => Stage::Done(Err(failure)),
                    }
                }
                Stage::PrimaryAttempt(request) => match self.try_primary(&request).await {
                    Some(account) => Stage::Done(Ok(account)),
                    None => Stage::FallbackAttempt {
                        request,
                        primary_attempted: true,
                    },
                },
                Stage::FallbackAttempt {
                    request,
                    primary_attempted,
                } => Stage::Done(self.try_fallback(&request, primary_attempted)),
                Stage::Done(result) => {
                    if let Ok(account) = &result {
                        metrics::count_verification(account.is_fallback());
                    }
                    return result;
                }
            };
        }
    }

    /// 依次尝试每个上游，返回第一个成功结果
    async fn try_primary(&self, request: &VerificationRequest) -> Option<VerifiedAccount> {
        let masked = redact_account_number(request.account_number());

        for provider in &self.primary {
            match provider.resolve_account_name(request).await {
                ProviderOutcome::Resolved(name) => {
                    tracing::info!(
                        "✅ {} 解析成功: {} @ {}",
                        provider.name(),
                        masked,
                        request.provider_code()
                    );
                    return Some(VerifiedAccount::primary(name, provider.name()));
                }
                ProviderOutcome::Rejected(reason) => {
                    tracing::warn!(
                        "⚠️ {} 拒绝解析 {} @ {}: {}",
                        provider.name(),
                        masked,
                        request.provider_code(),
                        reason
                    );
                }
                ProviderOutcome::Unreachable(GatewayError::Timeout { timeout_ms, .. }) => {
                    tracing::warn!(
                        "⏱️ {} 超时 ({}ms): {} @ {}",
                        provider.name(),
                        timeout_ms,
                        masked,
                        request.provider_code()
                    );
                }
                ProviderOutcome::Unreachable(err) => {
                    tracing::warn!("🔌 {} 不可达: {}", provider.name(), err);
                }
            }
        }

        None
    }

    fn try_fallback(
        &self,
        request: &VerificationRequest,
        primary_attempted: bool,
    ) -> VerificationResult {
        let provider = match ProviderClass::classify(request.provider_code()) {
            ProviderClass::Fallback(provider) => provider,
            ProviderClass::Standard if primary_attempted => {
                return Err(Failure::verification_failed(
                    "Could not verify account name with the bank",
                ))
            }
            ProviderClass::Standard => {
                return Err(Failure::service_unavailable(
                    "Account verification service is not configured for this bank",
                ))
            }
        };

        // classify 已过滤掉非降级代码，resolve 在此不会返回 NotAFallbackProvider
        let resolved = self
            .fallback
            .resolve(request.account_number(), request.provider_code())?;

        tracing::warn!(
            "🔁 使用降级名称: {} @ {} ({})",
            redact_account_number(request.account_number()),
            request.provider_code(),
            provider.label
        );
        Ok(VerifiedAccount::fallback(
            resolved.account_name,
            resolved.provider.label,
        ))
    }
}
