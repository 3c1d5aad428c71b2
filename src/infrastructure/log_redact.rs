//! 日志脱敏
//! 账户号、地址只显示尾部；错误文本中的凭证一律抹掉

use once_cell::sync::Lazy;
use regex::Regex;

/// 脱敏账户号（只保留后 4 位）
pub fn redact_account_number(account_number: &str) -> String {
    let len = account_number.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let tail: String = account_number.chars().skip(len - 4).collect();
    format!("{}{}", "*".repeat(len - 4), tail)
}

/// 脱敏地址（显示前6位和后4位）
pub fn redact_address(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return "*".repeat(address.chars().count());
    }

    let prefix = &address[..6];
    let suffix = &address[address.len() - 4..];
    format!("{}...{}", prefix, suffix)
}

static BEARER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(bearer\s+)[^\s,;]+").expect("static regex"));

static KEY_QUERY_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)((?:api_?key|secret_?key|token)=)[^&\s]+").expect("static regex")
});

/// 抹掉文本中的 Bearer token 与 apikey 查询参数
pub fn redact_secrets(text: &str) -> String {
    let text = BEARER_TOKEN.replace_all(text, "${1}***");
    KEY_QUERY_PARAM.replace_all(&text, "${1}***").into_owned()
}
