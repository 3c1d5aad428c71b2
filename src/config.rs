//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::{fmt, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 上游调用默认超时（毫秒）
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// 静态文件根目录（`/` 映射到其中的 index.html）
    pub static_dir: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 上游服务地址与超时
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub timeout_ms: u64,
    pub flutterwave_base_url: String,
    pub paystack_base_url: String,
    pub etherscan_base_url: String,
    /// 银行列表国家代码
    pub banks_country: String,
}

/// 上游凭证（只从环境变量或配置文件读取，永不输出）
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    #[serde(skip_serializing)]
    pub flutterwave_secret_key: Option<String>,
    #[serde(skip_serializing)]
    pub paystack_secret_key: Option<String>,
    #[serde(skip_serializing)]
    pub etherscan_api_key: Option<String>,
}

/// 速率限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u64,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// 空字符串视为未配置
fn env_secret(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:5000"),
            static_dir: env_or("STATIC_DIR", "."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: env_or("LOG_LEVEL", "info"),
            format: env_or("LOG_FORMAT", "text"),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_ms: env_parse_or("UPSTREAM_TIMEOUT_MS", DEFAULT_UPSTREAM_TIMEOUT_MS),
            flutterwave_base_url: env_or("FLUTTERWAVE_BASE_URL", "https://api.flutterwave.com"),
            paystack_base_url: env_or("PAYSTACK_BASE_URL", "https://api.paystack.co"),
            etherscan_base_url: env_or("ETHERSCAN_BASE_URL", "https://api.etherscan.io"),
            banks_country: env_or("BANKS_COUNTRY", "NG"),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            flutterwave_secret_key: env_secret("FLUTTERWAVE_SECRET_KEY"),
            paystack_secret_key: env_secret("PAYSTACK_SECRET_KEY"),
            etherscan_api_key: env_secret("ETHERSCAN_API_KEY"),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: env_parse_or("RATE_LIMIT_WINDOW_SECS", 60),
            max_requests: env_parse_or("RATE_LIMIT_MAX_REQUESTS", 100),
        }
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(v: &Option<String>) -> &'static str {
            if v.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("CredentialsConfig")
            .field("flutterwave_secret_key", &mask(&self.flutterwave_secret_key))
            .field("paystack_secret_key", &mask(&self.paystack_secret_key))
            .field("etherscan_api_key", &mask(&self.etherscan_api_key))
            .finish()
    }
}

impl CredentialsConfig {
    /// 是否配置了任一账户名解析上游
    pub fn has_primary_verification(&self) -> bool {
        self.flutterwave_secret_key.is_some() || self.paystack_secret_key.is_some()
    }

    /// 配置文件中的空字符串同样视为未配置
    fn normalize(&mut self) {
        for secret in [
            &mut self.flutterwave_secret_key,
            &mut self.paystack_secret_key,
            &mut self.etherscan_api_key,
        ] {
            if secret.as_deref().map(str::trim).unwrap_or_default().is_empty() {
                *secret = None;
            }
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            upstream: UpstreamConfig::default(),
            credentials: CredentialsConfig::default(),
            rate_limit: RateLimitConfig::default(),
        })
    }

    /// 从配置文件加载配置（缺失的段落回落到环境变量默认值）
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let mut config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;
        config.credentials.normalize();

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        if self.upstream.timeout_ms == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_MS must be greater than 0");
        }

        for (name, url) in [
            ("FLUTTERWAVE_BASE_URL", &self.upstream.flutterwave_base_url),
            ("PAYSTACK_BASE_URL", &self.upstream.paystack_base_url),
            ("ETHERSCAN_BASE_URL", &self.upstream.etherscan_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.rate_limit.window_secs == 0 || self.rate_limit.max_requests == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECS and RATE_LIMIT_MAX_REQUESTS must be greater than 0");
        }

        Ok(())
    }
}
