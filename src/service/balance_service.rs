//! 原生币余额查询服务
//!
//! `Validating → GatewayAttempt → (Success | Failed)`，网关失败即终止，无降级。

use crate::{
    domain::{BalanceResult, Failure},
    service::etherscan_client::EtherscanClient,
    utils::input_validator::InputValidator,
};

pub struct BalanceService {
    /// 未配置 ETHERSCAN_API_KEY 时为 None
    gateway: Option<EtherscanClient>,
}

impl BalanceService {
    pub fn new(gateway: Option<EtherscanClient>) -> Self {
        Self { gateway }
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    /// 先校验输入，再检查配置，最后调用网关
    pub async fn native_balance(
        &self,
        address: Option<&str>,
        chain_id: Option<&str>,
    ) -> BalanceResult {
        let request = InputValidator::balance_request(address, chain_id)?;

        let gateway = self.gateway.as_ref().ok_or_else(|| {
            Failure::service_unavailable("Balance lookup service is not configured")
        })?;

        gateway.native_balance(&request).await
    }
}
