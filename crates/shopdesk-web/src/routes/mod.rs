//! 게이트웨이 라우트.
//!
//! # 라우트 구조
//!
//! - `/health`, `/metrics` - 공개
//! - `/login`, `/logout`, `/auth/oauth`, `/unauthorized` - 세션
//! - `/` - 대시보드 (모든 로그인 사용자)
//! - `/products`, `/categories`, `/brands`, `/tags`, `/attributes`, `/orders` - VENDOR 이상
//! - `/users`, `/coupons`, `/campaigns` - ADMIN 이상
//!
//! 역할 검사는 라우트 가드가 담당하고, 핸들러는 [`CurrentSession`](crate::auth::CurrentSession)으로
//! 세션을 받습니다.

pub mod dashboard;
pub mod health;
pub mod resources;
pub mod session;

pub use dashboard::{dashboard_router, DashboardSummary, DashboardView};
pub use health::{health_router, HealthResponse};
pub use resources::{managed_resource_router, resource_router, DeletedView, ListView};
pub use session::{session_router, LoginFailure, LoginForm, LoginPageView, UnauthorizedView};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use shopdesk_backend::{
    Attributes, Brands, Campaigns, Categories, Coupons, Orders, Products, Tags, Users,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{panic_response, PageError};
use crate::guard::route_guard;
use crate::middleware::track_http_metrics;
use crate::state::AppState;

/// 페이지 라우터 (상태 미적용).
pub fn page_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .merge(session_router())
        .merge(dashboard_router())
        .nest("/products", resource_router::<Products>())
        .nest("/categories", resource_router::<Categories>())
        .nest("/brands", resource_router::<Brands>())
        .nest("/tags", resource_router::<Tags>())
        .nest("/attributes", resource_router::<Attributes>())
        .nest("/orders", resource_router::<Orders>())
        .nest("/coupons", resource_router::<Coupons>())
        .nest("/campaigns", resource_router::<Campaigns>())
        .nest("/users", managed_resource_router::<Users>())
        .fallback(not_found)
}

async fn not_found() -> PageError {
    PageError::NotFound("Page not found".to_string())
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// CORS 레이어.
///
/// 설정된 프론트엔드 origin만 자격 증명과 함께 허용합니다.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    match frontend_url.trim_end_matches('/').parse() {
        Ok(origin) => base
            .allow_origin(AllowOrigin::exact(origin))
            .allow_credentials(true),
        Err(_) => {
            warn!(frontend_url, "Invalid frontend URL, allowing any origin without credentials");
            base.allow_origin(AllowOrigin::any())
        }
    }
}

/// 전체 라우터 생성.
///
/// # Arguments
/// * `state` - 공유 상태
/// * `metrics_handle` - 설치된 Prometheus 레코더 핸들 (없으면 `/metrics` 미노출)
pub fn create_router(state: Arc<AppState>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let cors = cors_layer(&state.config.server.frontend_url);

    let pages = page_router()
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .with_state(state.clone());

    let app = match metrics_handle {
        Some(handle) => {
            info!("Metrics endpoint enabled");
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state(handle)
                .merge(pages)
        }
        None => pages,
    };

    app.layer(middleware::from_fn_with_state(state, track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors)
}
