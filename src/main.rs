//! Miles Gateway 主入口
//! 银行账户名解析 + 原生币余额查询 + 静态站点

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use miles_gateway::{api, app_state::AppState, config::Config, infrastructure::logging};

#[tokio::main]
async fn main() -> Result<()> {
    // ✅ 1. 加载环境变量
    dotenvy::dotenv().ok();

    // ✅ 2. 加载配置（CONFIG_PATH 指向的 TOML 覆盖环境变量默认值）
    let config_path = std::env::var("CONFIG_PATH").ok();
    let config = match Config::from_env_and_file(config_path.as_deref())
        .and_then(|config| config.validate().map(|_| config))
    {
        Ok(config) => config,
        Err(e) => {
            logging::init_default_logging();
            tracing::error!("❌ Invalid configuration: {:#}", e);
            return Err(e);
        }
    };

    // ✅ 3. 初始化日志
    logging::init_logging(&config.logging)?;
    tracing::info!("🚀 Starting Miles Gateway v{}", env!("CARGO_PKG_VERSION"));

    // ✅ 4. 初始化应用状态
    let config = Arc::new(config);
    let state = Arc::new(AppState::new(config.clone())?);

    // 上游配置概览（只记录是否配置，不记录凭证）
    tracing::info!(
        verification = ?state.verification.primary_names(),
        etherscan = state.balance.is_configured(),
        timeout_ms = config.upstream.timeout_ms,
        "🔧 Upstream providers"
    );
    if !config.credentials.has_primary_verification() {
        tracing::warn!("⚠️ No verification provider configured, only fallback providers will resolve");
    }

    // ✅ 5. 构建路由
    let app = api::routes(state);

    // ✅ 6. 启动服务器
    let bind_addr = config.server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("🎉 Server listening on http://{}", bind_addr);
    tracing::info!("📂 Static files from {}", config.server.static_dir);
    tracing::info!("📖 Swagger UI: http://{}/docs", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
