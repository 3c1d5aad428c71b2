//! 日志系统配置模块
//! 结构化日志（json）或文本日志，RUST_LOG 优先于 LOG_LEVEL

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// 初始化日志系统
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.level)))?;

    if config.format == "json" {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false).with_ansi(true))
            .try_init()?;
    }

    Ok(())
}

/// 简化初始化（使用默认配置）
pub fn init_default_logging() {
    let config = LoggingConfig::default();
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {}", e);
    });
}

fn default_directives(level: &str) -> String {
    format!(
        "miles_gateway={level},tower_http={level},reqwest=warn,hyper=warn",
        level = level.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives("DEBUG"),
            "miles_gateway=debug,tower_http=debug,reqwest=warn,hyper=warn"
        );
        assert!(EnvFilter::try_new(default_directives("info")).is_ok());
    }
}
