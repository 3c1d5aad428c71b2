//! 输入校验模块
//!
//! 纯函数，无 I/O：所有请求在发起任何网络调用之前都先经过这里。
//! 原始字段先去掉首尾空白再校验。

use crate::domain::{BalanceRequest, ChainId, Failure, VerificationRequest};

const ACCOUNT_NUMBER_LEN: usize = 10;
const PROVIDER_CODE_MIN_LEN: usize = 3;
const PROVIDER_CODE_MAX_LEN: usize = 7;
const EVM_ADDRESS_HEX_LEN: usize = 40;

/// 输入校验器
pub struct InputValidator;

impl InputValidator {
    /// 校验账户名解析请求
    ///
    /// 字段缺失、为空或格式错误都返回 `InvalidFormat`
    pub fn verification_request(
        account_number: Option<&str>,
        provider_code: Option<&str>,
    ) -> Result<VerificationRequest, Failure> {
        let (account_number, provider_code) = match (account_number, provider_code) {
            (Some(a), Some(b)) => (a.trim(), b.trim()),
            _ => {
                return Err(Failure::invalid_format(
                    "Missing required fields: account_number and bank_code",
                ))
            }
        };

        if account_number.is_empty() || provider_code.is_empty() {
            return Err(Failure::invalid_format(
                "Account number and bank code cannot be empty",
            ));
        }

        let account_number = Self::validate_account_number(account_number)?;
        let provider_code = Self::validate_provider_code(provider_code)?;

        Ok(VerificationRequest::new(account_number, provider_code))
    }

    /// 校验余额查询请求：先校验地址，再校验链
    pub fn balance_request(
        address: Option<&str>,
        chain_id: Option<&str>,
    ) -> Result<BalanceRequest, Failure> {
        let address = address.map(str::trim).unwrap_or_default();
        if address.is_empty() {
            return Err(Failure::invalid_format("Missing required parameter: address"));
        }
        let address = Self::validate_address(address)?;

        let chain_id = chain_id.map(str::trim).unwrap_or_default();
        if chain_id.is_empty() {
            return Err(Failure::invalid_format("Missing required parameter: chainid"));
        }
        let chain = Self::validate_chain_id(chain_id)?;

        Ok(BalanceRequest::new(address, chain))
    }

    /// 账户号：恰好 10 位 ASCII 数字
    pub fn validate_account_number(raw: &str) -> Result<String, Failure> {
        let value = raw.trim();
        if value.len() != ACCOUNT_NUMBER_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Failure::invalid_format(
                "Invalid account number format. Must be 10 digits.",
            ));
        }
        Ok(value.to_string())
    }

    /// 银行/服务商代码：3-7 位单词字符 [A-Za-z0-9_]
    pub fn validate_provider_code(raw: &str) -> Result<String, Failure> {
        let value = raw.trim();
        let len_ok = (PROVIDER_CODE_MIN_LEN..=PROVIDER_CODE_MAX_LEN).contains(&value.len());
        if !len_ok || !value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(Failure::invalid_format(
                "Invalid bank code format. Must be 3-7 alphanumeric characters.",
            ));
        }
        Ok(value.to_string())
    }

    /// EVM 地址：`0x` + 40 位十六进制（不做 EIP-55 校验）
    pub fn validate_address(raw: &str) -> Result<String, Failure> {
        let value = raw.trim();
        let valid = value
            .strip_prefix("0x")
            .map(|hex| hex.len() == EVM_ADDRESS_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .unwrap_or(false);

        if !valid {
            return Err(Failure::invalid_format(
                "Invalid address format. Must be 0x followed by 40 hex characters.",
            ));
        }
        Ok(value.to_string())
    }

    /// 链 ID：必须在支持列表中，非数字同样视为不支持
    pub fn validate_chain_id(raw: &str) -> Result<ChainId, Failure> {
        raw.trim()
            .parse::<u64>()
            .ok()
            .and_then(ChainId::from_id)
            .ok_or_else(|| {
                Failure::unsupported_chain(format!(
                    "Unsupported chain id {}. Supported: {}",
                    raw.trim(),
                    ChainId::supported_list()
                ))
            })
    }
}
