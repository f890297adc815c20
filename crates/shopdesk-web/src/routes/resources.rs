//! 리소스 관리 화면 endpoint.
//!
//! 모든 리소스가 같은 핸들러를 공유합니다.
//!
//! - `GET /{resource}` - 목록 (백엔드 실패 시 빈 목록 + 경고)
//! - `POST /{resource}` - 생성
//! - `GET /{resource}/{id}` - 상세
//! - `PUT /{resource}/{id}` - 수정
//! - `DELETE /{resource}/{id}` - 삭제

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shopdesk_backend::{ListQuery, Paged, Resource, ResourceApi};
use tracing::warn;

use crate::auth::CurrentSession;
use crate::error::{ApiEnvelope, PageError, PageResult};
use crate::extract::{PageJson, PageQuery};
use crate::state::AppState;

/// 목록 화면 데이터.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListView<T> {
    pub success: bool,
    pub resource: String,
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    /// 백엔드 실패로 빈 목록을 보여줄 때의 안내
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> ListView<T> {
    fn loaded(resource: &str, paged: Paged<T>) -> Self {
        Self {
            success: true,
            resource: resource.to_string(),
            items: paged.items,
            total: paged.total,
            page: paged.page,
            limit: paged.limit,
            warning: None,
        }
    }

    fn degraded(resource: &str, warning: String) -> Self {
        let empty = Paged::empty();
        Self {
            success: false,
            resource: resource.to_string(),
            items: empty.items,
            total: empty.total,
            page: empty.page,
            limit: empty.limit,
            warning: Some(warning),
        }
    }
}

/// 삭제 결과.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedView {
    pub id: String,
}

/// GET /{resource}
pub async fn list_page<R: Resource>(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    PageQuery(query): PageQuery<ListQuery>,
) -> PageResult<Json<ListView<R::Model>>> {
    match ResourceApi::<R>::new(&state.backend)
        .list(&query, session.token())
        .await
    {
        Ok(paged) => Ok(Json(ListView::loaded(R::NAME, paged))),
        Err(e) if e.is_auth_error() => Err(e.into()),
        Err(e) => {
            warn!(resource = R::NAME, error = %e, "List degraded to empty");
            Ok(Json(ListView::degraded(R::NAME, e.user_message())))
        }
    }
}

/// GET /{resource}/{id}
pub async fn get_page<R: Resource>(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> PageResult<Json<ApiEnvelope<R::Model>>> {
    let model = ResourceApi::<R>::new(&state.backend)
        .get(&id, session.token())
        .await
        .map_err(|e| not_found_or(e, R::NAME, &id))?;
    Ok(Json(ApiEnvelope::ok(model)))
}

/// POST /{resource}
pub async fn create_page<R: Resource>(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    PageJson(input): PageJson<R::Input>,
) -> PageResult<(StatusCode, Json<ApiEnvelope<R::Model>>)> {
    let model = ResourceApi::<R>::new(&state.backend)
        .create(&input, session.token())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(model).with_message(format!("{} created", R::NAME))),
    ))
}

/// PUT /{resource}/{id}
pub async fn update_page<R: Resource>(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Path(id): Path<String>,
    PageJson(input): PageJson<R::Input>,
) -> PageResult<Json<ApiEnvelope<R::Model>>> {
    let model = ResourceApi::<R>::new(&state.backend)
        .update(&id, &input, session.token())
        .await
        .map_err(|e| not_found_or(e, R::NAME, &id))?;
    Ok(Json(
        ApiEnvelope::ok(model).with_message(format!("{} updated", R::NAME)),
    ))
}

/// DELETE /{resource}/{id}
pub async fn delete_page<R: Resource>(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> PageResult<Json<ApiEnvelope<DeletedView>>> {
    ResourceApi::<R>::new(&state.backend)
        .delete(&id, session.token())
        .await
        .map_err(|e| not_found_or(e, R::NAME, &id))?;
    Ok(Json(
        ApiEnvelope::ok(DeletedView { id }).with_message(format!("{} deleted", R::NAME)),
    ))
}

fn not_found_or(error: shopdesk_backend::BackendError, resource: &str, id: &str) -> PageError {
    match error.status() {
        404 if !error.is_auth_error() => PageError::NotFound(format!("{resource} {id} not found")),
        _ => PageError::Backend(error),
    }
}

/// 목록/생성/상세/수정/삭제 라우터.
pub fn resource_router<R: Resource>() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_page::<R>).post(create_page::<R>))
        .route(
            "/{id}",
            get(get_page::<R>).put(update_page::<R>).delete(delete_page::<R>),
        )
}

/// 생성 없는 라우터 (사용자 관리).
pub fn managed_resource_router<R: Resource>() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_page::<R>)).route(
        "/{id}",
        get(get_page::<R>).put(update_page::<R>).delete(delete_page::<R>),
    )
}
