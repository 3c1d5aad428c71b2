use std::sync::Arc;

use crate::{
    api::middleware::rate_limit::RateLimiter,
    config::Config,
    infrastructure::upstream::UpstreamClient,
    service::{
        balance_service::BalanceService,
        bank::{AccountNameProvider, FlutterwaveClient, PaystackClient},
        bank_directory::BankDirectory,
        etherscan_client::EtherscanClient,
        fallback_resolver::FallbackResolver,
        verification_orchestrator::VerificationOrchestrator,
    },
};

/// 应用状态
/// 包含所有共享资源（只读，除限流计数器外）
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verification: Arc<VerificationOrchestrator>,
    pub balance: Arc<BalanceService>,
    pub banks: Arc<BankDirectory>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// 根据配置装配上游客户端与服务
    pub fn new(config: Arc<Config>) -> anyhow::Result<Self> {
        // 所有上游共享一个连接池
        let upstream = UpstreamClient::new(config.upstream.timeout())?;
        let credentials = &config.credentials;

        let flutterwave = credentials.flutterwave_secret_key.as_deref().map(|key| {
            FlutterwaveClient::new(upstream.clone(), &config.upstream.flutterwave_base_url, key)
        });

        // 优先级：Flutterwave → Paystack
        let mut primary: Vec<Arc<dyn AccountNameProvider>> = Vec::new();
        if let Some(client) = flutterwave.clone() {
            primary.push(Arc::new(client));
        }
        if let Some(key) = credentials.paystack_secret_key.as_deref() {
            primary.push(Arc::new(PaystackClient::new(
                upstream.clone(),
                &config.upstream.paystack_base_url,
                key,
            )));
        }

        let etherscan = credentials.etherscan_api_key.as_deref().map(|key| {
            EtherscanClient::new(upstream.clone(), &config.upstream.etherscan_base_url, key)
        });

        let verification = Arc::new(VerificationOrchestrator::new(
            primary,
            FallbackResolver::new(),
        ));
        let balance = Arc::new(BalanceService::new(etherscan));
        let banks = Arc::new(BankDirectory::new(
            flutterwave,
            config.upstream.banks_country.clone(),
        ));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit.window_secs,
            config.rate_limit.max_requests,
        ));

        Ok(Self {
            config,
            verification,
            balance,
            banks,
            rate_limiter,
        })
    }
}
