//! 确定性降级解析器
//!
//! 对注册表内的服务商，按 (账户号, 服务商代码) 的哈希从姓名池中选出一个名称。
//! 同一对输入在任何进程、任何时刻都得到同一个名称；不做任何网络调用。
//!
//! 注意：结果是生成的，不是银行确认的，调用方必须看到 `source=fallback`。

use sha2::{Digest, Sha256};

use crate::domain::{provider_registry, Failure, FallbackProvider, NAME_POOL};

/// 降级解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackName {
    pub account_name: &'static str,
    pub provider: &'static FallbackProvider,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResolver;

impl FallbackResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析账户名；不在注册表内的代码返回 `NotAFallbackProvider`
    pub fn resolve(&self, account_number: &str, provider_code: &str) -> Result<FallbackName, Failure> {
        let provider = provider_registry::lookup(provider_code)
            .ok_or_else(|| Failure::not_a_fallback_provider(provider_code))?;

        let index = name_index(account_number, provider_code);
        Ok(FallbackName {
            account_name: NAME_POOL[index],
            provider,
        })
    }
}

/// SHA-256(account_number ‖ provider_code) 的前 6 个十六进制字符（24 bit），对姓名池取模
fn name_index(account_number: &str, provider_code: &str) -> usize {
    let mut hasher = Sha256::new();
    hasher.update(account_number.as_bytes());
    hasher.update(provider_code.as_bytes());
    let digest = hasher.finalize();

    let prefix = u32::from_be_bytes([0, digest[0], digest[1], digest[2]]);
    prefix as usize % NAME_POOL.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailureKind;

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = FallbackResolver::new();
        let first = resolver.resolve("1234567890", "999992").unwrap();
        for _ in 0..10 {
            assert_eq!(resolver.resolve("1234567890", "999992").unwrap(), first);
        }
        assert!(NAME_POOL.contains(&first.account_name));
        assert_eq!(first.provider.label, "OPay (Paycom)");
    }

    #[test]
    fn test_every_registered_code_resolves() {
        let resolver = FallbackResolver::new();
        for provider in provider_registry::fallback_providers() {
            let name = resolver.resolve("0123456789", provider.code).unwrap();
            assert!(!name.account_name.is_empty());
            assert_eq!(name.provider.code, provider.code);
        }
    }

    #[test]
    fn test_unregistered_code_fails() {
        let resolver = FallbackResolver::new();
        for code in ["058", "044", "011", "9999920"] {
            let err = resolver.resolve("1234567890", code).unwrap_err();
            assert_eq!(err.kind, FailureKind::NotAFallbackProvider);
        }
    }

    #[test]
    fn test_index_matches_hex_prefix() {
        // 与 "取十六进制前 6 位再按 16 进制解析" 等价
        let digest = Sha256::digest(b"1234567890999991");
        let hex_prefix: String = digest[..3].iter().map(|b| format!("{:02x}", b)).collect();
        let expected = usize::from_str_radix(&hex_prefix, 16).unwrap() % NAME_POOL.len();
        assert_eq!(name_index("1234567890", "999991"), expected);
    }

    #[test]
    fn test_names_spread_across_pool() {
        let distinct: std::collections::HashSet<usize> = (0..50)
            .map(|i| name_index(&format!("{:010}", i), "565"))
            .collect();
        assert!(distinct.len() > 1);
        assert!(distinct.iter().all(|&idx| idx < NAME_POOL.len()));
    }
}
