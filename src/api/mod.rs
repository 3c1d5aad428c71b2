use std::{sync::Arc, time::Instant};

use axum::{
    extract::{Request, State},
    handler::HandlerWithoutStateExt,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA,
        },
        HeaderValue, Method, StatusCode,
    },
    middleware::{from_fn, from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tracing::Level;
use utoipa::{OpenApi, ToSchema};

use crate::{
    api::middleware::{rate_limit_middleware, trace_id_middleware},
    app_state::AppState,
    error::AppError,
};

pub mod balance_api;
pub mod banks_api;
pub mod middleware;
pub mod verify_api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Miles Gateway API",
        description = "Bank account-name verification, bank list and native balance lookup"
    ),
    paths(
        verify_api::verify_account,
        balance_api::get_balance,
        banks_api::list_banks,
        healthz
    ),
    components(
        schemas(
            verify_api::VerifyAccountRequest,
            verify_api::VerifyAccountResponse,
            balance_api::BalanceResponse,
            banks_api::BanksResponse,
            Healthz,
            crate::error_body::ErrorBodyDoc
        )
    ),
    tags(
        (name = "verification", description = "Account-name verification with deterministic fallback"),
        (name = "balance", description = "Native coin balance lookup"),
        (name = "banks", description = "Bank directory")
    )
)]
pub struct ApiDoc;

/// 构建完整路由：API + 运维端点 + 静态文件
pub fn routes(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.server.static_dir)
        .append_index_html_on_directories(true)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .route(
            "/api/verify_account",
            post(verify_api::verify_account).fallback(not_found),
        )
        .route(
            "/api/crypto/balance",
            get(balance_api::get_balance).fallback(not_found),
        )
        .route("/api/banks", get(banks_api::list_banks).fallback(not_found))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .merge(utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(trace_id_middleware))
                .layer(from_fn(trace_log))
                .layer(from_fn(cors_and_cache_headers))
                .layer(from_fn_with_state(state.clone(), rate_limit_middleware)),
        )
        .with_state(state)
}

/// 未匹配的路由：POST 等写方法视为 API 调用，其余视为静态文件
async fn not_found(method: Method) -> AppError {
    if method == Method::GET || method == Method::HEAD {
        AppError::not_found("File not found")
    } else {
        AppError::not_found("API endpoint not found")
    }
}

#[derive(Serialize, ToSchema)]
pub struct Healthz {
    pub status: String,
    pub version: String,
    /// 是否配置了任一账户名解析上游
    pub primary_verification: bool,
    pub balance_lookup: bool,
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "OK", body = Healthz))
)]
pub async fn healthz(State(st): State<Arc<AppState>>) -> Json<Healthz> {
    crate::metrics::count_ok("GET /healthz");
    Json(Healthz {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        primary_verification: st.verification.has_primary(),
        balance_lookup: st.balance.is_configured(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn metrics() -> Response {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::render_prometheus(),
    )
        .into_response()
}

/// CORS + 禁止缓存；OPTIONS 预检在此直接返回 200
async fn cors_and_cache_headers(req: Request, next: Next) -> Response {
    let mut resp = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    let headers = resp.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    resp
}

async fn trace_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    let resp = next.run(req).await;
    let status = resp.status();
    let elapsed = start.elapsed().as_millis();
    tracing::event!(Level::INFO, method=%method, path=%path, status=%status.as_u16(), elapsed_ms=%elapsed, "http_request");
    resp
}
