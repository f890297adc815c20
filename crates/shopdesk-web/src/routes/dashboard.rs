//! 대시보드 랜딩 endpoint.
//!
//! 로그인한 사용자 정보와, 역할에 따라 카탈로그/주문 요약을 보여줍니다.
//! 요약 항목은 서로 독립적으로 동시에 조회하고, 실패한 항목은 경고로 대체합니다.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use shopdesk_backend::{BackendError, BackendResult, ListQuery, Paged};
use shopdesk_core::{Role, UserProfile};
use tracing::warn;

use crate::auth::CurrentSession;
use crate::error::PageResult;
use crate::state::AppState;

/// 대시보드 화면 데이터.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardView {
    pub page: String,
    pub greeting: String,
    pub user: UserProfile,
    pub role: Role,
    pub summary: DashboardSummary,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// 리소스별 전체 건수. 조회하지 않았거나 실패한 항목은 `None`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub products: Option<u64>,
    pub orders: Option<u64>,
    pub categories: Option<u64>,
    pub brands: Option<u64>,
    pub users: Option<u64>,
}

/// GET /
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
) -> PageResult<Json<DashboardView>> {
    let token = session.token();
    let role = session.0.role();
    let mut summary = DashboardSummary::default();
    let mut warnings = Vec::new();

    if role.is_vendor_or_above() {
        // 건수만 필요하므로 한 건씩 조회
        let count_query = ListQuery::page(1, 1);
        let backend = &state.backend;
        let (products_api, orders_api, categories_api, brands_api) = (
            backend.products(),
            backend.orders(),
            backend.categories(),
            backend.brands(),
        );
        let (products, orders, categories, brands) = tokio::join!(
            products_api.list(&count_query, token),
            orders_api.list(&count_query, token),
            categories_api.list(&count_query, token),
            brands_api.list(&count_query, token),
        );

        summary.products = count("products", products, &mut warnings)?;
        summary.orders = count("orders", orders, &mut warnings)?;
        summary.categories = count("categories", categories, &mut warnings)?;
        summary.brands = count("brands", brands, &mut warnings)?;

        if role.is_admin() {
            let users = backend.users().list(&count_query, token).await;
            summary.users = count("users", users, &mut warnings)?;
        }
    }

    let user = session.0.user;
    Ok(Json(DashboardView {
        page: "dashboard".to_string(),
        greeting: format!("Welcome back, {}", user.display_name()),
        role: user.role,
        user,
        summary,
        warnings,
    }))
}

/// 건수 추출. 인증 에러만 전파하고 나머지는 경고로 남깁니다.
fn count<T>(
    label: &str,
    result: BackendResult<Paged<T>>,
    warnings: &mut Vec<String>,
) -> Result<Option<u64>, BackendError> {
    match result {
        Ok(paged) => Ok(Some(paged.total)),
        Err(e) if e.is_auth_error() => Err(e),
        Err(e) => {
            warn!(label, error = %e, "Dashboard summary item unavailable");
            warnings.push(format!("{label}: {}", e.user_message()));
            Ok(None)
        }
    }
}

/// 대시보드 라우터.
pub fn dashboard_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(dashboard))
}
