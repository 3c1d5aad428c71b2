pub mod balance_service;
pub mod bank; // 账户名解析上游（Flutterwave / Paystack）
pub mod bank_directory;
pub mod etherscan_client;
pub mod fallback_resolver;
pub mod verification_orchestrator;
