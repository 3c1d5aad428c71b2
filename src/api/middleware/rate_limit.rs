//! 速率限制中间件
//! 进程内固定窗口计数，按客户端 IP 计数

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{app_state::AppState, error::AppError, metrics};

/// 清理过期窗口的阈值
const SWEEP_THRESHOLD: usize = 10_000;

struct Window {
    started: Instant,
    count: u64,
}

/// 单次计数结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    /// 距离窗口重置的秒数
    pub reset_after_secs: u64,
}

pub struct RateLimiter {
    window: Duration,
    max_requests: u64,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(window_secs: u64, max_requests: u64) -> Self {
        Self {
            window: Duration::from_secs(window_secs),
            max_requests,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// 计数并判断是否放行；锁只在计数期间持有
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if windows.len() > SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;

        let elapsed = now.duration_since(entry.started);
        RateLimitDecision {
            allowed: entry.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_after_secs: self.window.saturating_sub(elapsed).as_secs().max(1),
        }
    }
}

/// 速率限制中间件
pub async fn rate_limit_middleware(
    State(st): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req);
    let decision = st.rate_limiter.check(&key);

    let mut response = if decision.allowed {
        next.run(req).await
    } else {
        metrics::count_rate_limited();
        tracing::warn!(client = %key, "🚫 Rate limit exceeded");
        AppError::rate_limit_exceeded(format!(
            "Rate limit exceeded: {} requests per {} seconds",
            decision.limit,
            st.rate_limiter.window.as_secs()
        ))
        .into_response()
    };

    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "X-RateLimit-Reset",
        HeaderValue::from(decision.reset_after_secs),
    );

    response
}

/// 确定限流键：X-Forwarded-For > X-Real-IP > 连接地址
fn client_key(req: &Request) -> String {
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            req.headers()
                .get("X-Real-IP")
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
        })
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_window() {
        let limiter = RateLimiter::new(60, 2);
        let now = Instant::now();

        let first = limiter.check_at("1.2.3.4", now);
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);

        assert!(limiter.check_at("1.2.3.4", now).allowed);
        let third = limiter.check_at("1.2.3.4", now);
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);

        // 其他客户端不受影响
        assert!(limiter.check_at("5.6.7.8", now).allowed);

        // 窗口过期后重置
        let later = now + Duration::from_secs(61);
        assert!(limiter.check_at("1.2.3.4", later).allowed);
    }

    #[test]
    fn test_client_key_prefers_forwarded_for() {
        let req = Request::builder()
            .header("X-Forwarded-For", "10.0.0.1, 172.16.0.1")
            .header("X-Real-IP", "10.0.0.2")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), "10.0.0.1");

        let req = Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), "unknown");
    }
}
