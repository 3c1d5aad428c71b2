//! 余额查询支持的链
//!
//! 仅支持两个 EVM 主网：Ethereum (1) 与 BNB Smart Chain (56)

use std::fmt;

use serde::Serialize;

/// 链标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u64")]
pub enum ChainId {
    Ethereum,
    BnbSmartChain,
}

impl ChainId {
    /// 支持的链（顺序即对外展示顺序）
    pub const SUPPORTED: [ChainId; 2] = [ChainId::Ethereum, ChainId::BnbSmartChain];

    pub fn from_id(id: u64) -> Option<Self> {
        Self::SUPPORTED.into_iter().find(|chain| chain.id() == id)
    }

    pub fn id(self) -> u64 {
        match self {
            ChainId::Ethereum => 1,
            ChainId::BnbSmartChain => 56,
        }
    }

    /// 对外返回的网络名称
    pub fn network_label(self) -> &'static str {
        match self {
            ChainId::Ethereum => "Ethereum Mainnet",
            ChainId::BnbSmartChain => "BNB Smart Chain",
        }
    }

    pub fn native_symbol(self) -> &'static str {
        match self {
            ChainId::Ethereum => "ETH",
            ChainId::BnbSmartChain => "BNB",
        }
    }

    /// "1, 56"，用于错误提示
    pub fn supported_list() -> String {
        Self::SUPPORTED
            .iter()
            .map(|chain| chain.id().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<ChainId> for u64 {
    fn from(chain: ChainId) -> Self {
        chain.id()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.network_label(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(ChainId::from_id(1), Some(ChainId::Ethereum));
        assert_eq!(ChainId::from_id(56), Some(ChainId::BnbSmartChain));
        assert_eq!(ChainId::from_id(2), None);
        assert_eq!(ChainId::from_id(137), None);
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ChainId::BnbSmartChain).unwrap();
        assert_eq!(json, "56");
    }

    #[test]
    fn test_supported_list() {
        assert_eq!(ChainId::supported_list(), "1, 56");
    }
}
