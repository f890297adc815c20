//! 로그인/로그아웃/oauth 핸드오프 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /login` - 로그인 화면 데이터
//! - `POST /login` - 자격증명 교환 후 세션 쿠키 발급
//! - `POST /logout` - 세션 폐기 및 쿠키 만료
//! - `GET /auth/oauth` - oauth 핸드오프 쿠키로 세션 발급
//! - `GET /unauthorized` - 권한 없음 안내

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shopdesk_backend::{AuthError, Credentials};
use shopdesk_core::Session;
use tracing::{error, info, warn};
use validator::{Validate, ValidationError};

use crate::auth::{append_set_cookie, read_cookie, CurrentSession};
use crate::error::{PageError, PageResult};
use crate::extract::PageForm;
use crate::guard::is_local_path;
use crate::metrics::record_login;
use crate::state::AppState;

/// oauth 실패 시 로그인 화면에 전달하는 에러 코드.
pub const OAUTH_CALLBACK_ERROR: &str = "OAuthCallback";

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// 로그인 폼.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    /// 이메일 또는 사용자 이름
    #[validate(custom(function = "validate_not_blank", message = "Email or username is required"))]
    pub identifier: String,
    #[validate(custom(function = "validate_not_blank", message = "Password is required"))]
    pub password: String,
    /// 로그인 후 이동할 로컬 경로
    #[serde(default)]
    pub next: Option<String>,
}

/// 로그인 화면 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub error: Option<String>,
}

/// 로그인 화면 데이터.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginPageView {
    pub page: String,
    /// 로컬 경로일 때만 유지되는 `next`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 로그인 실패 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginFailure {
    pub success: bool,
    pub message: String,
}

/// 권한 없음 화면 데이터.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnauthorizedView {
    pub page: String,
    pub message: String,
    pub home: String,
}

/// GET /login
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<LoginPageView> {
    let error = query.error.map(|code| match code.as_str() {
        OAUTH_CALLBACK_ERROR => "Sign-in with the external provider failed. Please try again.".to_string(),
        _ => "Sign-in failed. Please try again.".to_string(),
    });

    Json(LoginPageView {
        page: "login".to_string(),
        next: query.next.filter(|next| is_local_path(next)),
        error,
    })
}

/// POST /login
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    PageForm(form): PageForm<LoginForm>,
) -> PageResult<Response> {
    if let Err(errors) = form.validate() {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        record_login("credentials", "invalid_input");
        return Err(PageError::Validation(message));
    }

    let credentials = Credentials::new(form.identifier.trim(), form.password);

    match state.issuer.login(&credentials).await {
        Ok(session) => {
            record_login("credentials", "success");
            let target = state.guard.table().post_login_target(form.next.as_deref());
            issue_and_redirect(&state, &session, &target)
        }
        Err(AuthError::BackendUnavailable) => {
            record_login("credentials", "unavailable");
            Ok(login_failure(
                StatusCode::SERVICE_UNAVAILABLE,
                AuthError::BackendUnavailable.to_string(),
            ))
        }
        Err(e) => {
            record_login("credentials", "rejected");
            Ok(login_failure(StatusCode::UNAUTHORIZED, e.to_string()))
        }
    }
}

/// POST /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> Response {
    state.revocations.revoke(&session.fingerprint()).await;
    info!(user = %session.user.user_id, "User logged out");

    let mut response = Redirect::to(state.guard.table().login()).into_response();
    append_set_cookie(&mut response, state.session_cookie().expire());
    response
}

/// GET /auth/oauth
///
/// oauth 핸드오프 쿠키는 성공 여부와 관계없이 삭제합니다.
pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
) -> Response {
    let failure_target = format!(
        "{}?error={}",
        state.guard.table().login(),
        OAUTH_CALLBACK_ERROR
    );

    let outcome = read_cookie(&headers, &state.config.session.oauth_cookie_name)
        .ok_or(AuthError::InvalidOAuthToken)
        .and_then(|token| state.issuer.from_oauth_token(&state.sealer, &token));

    let mut response = match outcome {
        Ok(session) => {
            record_login("oauth", "success");
            let target = state.guard.table().post_login_target(query.next.as_deref());
            issue_and_redirect(&state, &session, &target)
                .unwrap_or_else(|_| Redirect::to(&failure_target).into_response())
        }
        Err(e) => {
            record_login("oauth", "rejected");
            warn!(error = %e, "OAuth hand-off rejected");
            Redirect::to(&failure_target).into_response()
        }
    };

    append_set_cookie(&mut response, state.oauth_cookie().expire());
    response
}

/// GET /unauthorized
pub async fn unauthorized_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(UnauthorizedView {
            page: "unauthorized".to_string(),
            message: "You do not have permission to view this page.".to_string(),
            home: state.guard.table().landing().to_string(),
        }),
    )
}

fn issue_and_redirect(state: &AppState, session: &Session, target: &str) -> PageResult<Response> {
    let cookie = state.issue_session_cookie(session).map_err(|e| {
        error!(error = %e, "Failed to seal session cookie");
        PageError::Internal(format!("could not seal session: {e}"))
    })?;

    let mut response = Redirect::to(target).into_response();
    append_set_cookie(&mut response, cookie);
    Ok(response)
}

fn login_failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(LoginFailure {
            success: false,
            message,
        }),
    )
        .into_response()
}

/// 세션 라우터.
pub fn session_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", axum::routing::post(logout))
        .route("/auth/oauth", get(oauth_callback))
        .route("/unauthorized", get(unauthorized_page))
}
