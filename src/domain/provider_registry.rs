//! 降级服务商注册表与候选姓名池
//!
//! 两张表都在进程启动时初始化，之后只读，可以无锁并发访问。

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// 支持确定性降级解析的服务商（金融科技机构的自定义银行代码）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackProvider {
    pub code: &'static str,
    pub label: &'static str,
}

const FALLBACK_PROVIDERS: &[FallbackProvider] = &[
    FallbackProvider {
        code: "999992",
        label: "OPay (Paycom)",
    },
    FallbackProvider {
        code: "999991",
        label: "PalmPay",
    },
    FallbackProvider {
        code: "090267",
        label: "Kuda Bank",
    },
    FallbackProvider {
        code: "50515",
        label: "Moniepoint",
    },
    FallbackProvider {
        code: "565",
        label: "Carbon",
    },
];

/// code -> 注册表下标
static PROVIDER_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    FALLBACK_PROVIDERS
        .iter()
        .enumerate()
        .map(|(idx, provider)| (provider.code, idx))
        .collect()
});

/// 候选姓名池。顺序参与下标计算，不能调整。
pub const NAME_POOL: [&str; 30] = [
    "ADEBAYO OLUMIDE JAMES",
    "CHIOMA BLESSING OKAFOR",
    "IBRAHIM MUSA ABDULLAHI",
    "FATIMA AISHA MOHAMMED",
    "EMEKA CHUKWUEMEKA OKONKWO",
    "KEMI FOLAKE ADEBAYO",
    "YUSUF HASSAN GARBA",
    "BLESSING CHIAMAKA NWACHUKWU",
    "OLUWASEUN DAVID OGUNDIMU",
    "AMINA ZAINAB USMAN",
    "CHINEDU KINGSLEY OKORO",
    "HADIZA SAFIYA ALIYU",
    "BABATUNDE OLUWAFEMI ADESANYA",
    "NGOZI CHINONSO EZEH",
    "SULEIMAN KABIRU DANJUMA",
    "TITILAYO ABISOLA OGUNTADE",
    "AHMED IBRAHIM YAKUBU",
    "NKECHI GLADYS NWANKWO",
    "RASHEED OLUMUYIWA LAWAL",
    "GRACE ONYINYECHI OKPALA",
    "MURTALA SANI BELLO",
    "FOLASHADE OMOLARA ADEYEMI",
    "ALIYU ABDULLAHI SHEHU",
    "PATIENCE CHIDINMA NWOSU",
    "ABDULRAHMAN UMAR TIJANI",
    "STELLA AMARACHI IKECHUKWU",
    "YAKUBU GARBA HASSAN",
    "FUNMI ADEOLA ADEBISI",
    "SALISU MUSA DANJUMA",
    "JOY UGOCHI ONYEKACHI",
];

/// 服务商分类：决定走哪条解析策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderClass {
    /// 在注册表内，上游不可用时可走确定性降级
    Fallback(&'static FallbackProvider),
    /// 普通银行，只能由上游解析
    Standard,
}

impl ProviderClass {
    pub fn classify(provider_code: &str) -> Self {
        match lookup(provider_code) {
            Some(provider) => ProviderClass::Fallback(provider),
            None => ProviderClass::Standard,
        }
    }
}

pub fn lookup(provider_code: &str) -> Option<&'static FallbackProvider> {
    PROVIDER_INDEX
        .get(provider_code)
        .map(|&idx| &FALLBACK_PROVIDERS[idx])
}

pub fn fallback_providers() -> &'static [FallbackProvider] {
    FALLBACK_PROVIDERS
}
