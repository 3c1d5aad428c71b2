//! Miles Gateway
//!
//! 银行账户名解析（上游优先，白名单服务商确定性降级）、
//! 银行列表透传、EVM 原生币余额查询

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod error_body;
pub mod infrastructure;
pub mod metrics;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use app_state::AppState;
pub use error::{AppError, AppErrorCode};
