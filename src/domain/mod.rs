//! 领域模型：请求、结果、静态注册表

pub mod chain;
pub mod outcome;
pub mod provider_registry;
pub mod request;

pub use chain::ChainId;
pub use outcome::{
    BalanceResult, Failure, FailureKind, NativeBalance, Source, VerificationResult,
    VerifiedAccount,
};
pub use provider_registry::{FallbackProvider, ProviderClass, NAME_POOL};
pub use request::{BalanceRequest, VerificationRequest};
