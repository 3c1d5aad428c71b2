//! 已校验的请求
//!
//! 只能由 [`crate::utils::input_validator::InputValidator`] 构造，构造后不可变。

use crate::domain::chain::ChainId;

/// 账户名解析请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    account_number: String,
    provider_code: String,
}

impl VerificationRequest {
    pub(crate) fn new(account_number: String, provider_code: String) -> Self {
        Self {
            account_number,
            provider_code,
        }
    }

    /// 10 位数字
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// 银行/服务商代码，3-7 位
    pub fn provider_code(&self) -> &str {
        &self.provider_code
    }
}

/// 原生币余额查询请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRequest {
    address: String,
    chain: ChainId,
}

impl BalanceRequest {
    pub(crate) fn new(address: String, chain: ChainId) -> Self {
        Self { address, chain }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }
}
