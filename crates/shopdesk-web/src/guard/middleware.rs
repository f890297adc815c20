//! 라우트 가드 미들웨어.
//!
//! 세션 쿠키를 해제해 [`RouteGuard::evaluate`](super::RouteGuard::evaluate)로 결정을 내리고,
//! 통과한 요청에는 세션을 요청 확장값으로 넣습니다. 응답에 인증 에러 경계가 있으면
//! 로그인 링크를 채우고 세션 쿠키를 삭제합니다.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use super::{GuardDecision, RouteClass};
use crate::auth::append_set_cookie;
use crate::error::{boundary_response, BoundaryFailure, BoundaryKind};
use crate::metrics::record_guard_decision;
use crate::state::{AppState, SessionLookup};

/// 라우트 가드 미들웨어.
///
/// `axum::middleware::from_fn_with_state`로 라우터 전체에 적용합니다.
pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    if state.guard.table().classify(&path) == RouteClass::Static {
        record_guard_decision(GuardDecision::Bypass.label());
        return next.run(request).await;
    }

    let lookup = state.resolve_session(request.headers()).await;
    let decision = state
        .guard
        .evaluate(&path, query.as_deref(), lookup.session());

    record_guard_decision(decision.label());
    debug!(
        path = %path,
        decision = decision.label(),
        authenticated = lookup.session().is_some(),
        "Route guard decision"
    );

    let mut response = match decision {
        GuardDecision::Redirect(location) => Redirect::to(&location).into_response(),
        GuardDecision::Allow | GuardDecision::Bypass => {
            if let SessionLookup::Valid(session) = &lookup {
                request.extensions_mut().insert(session.clone());
            }
            next.run(request).await
        }
    };

    let auth_failure = response
        .extensions()
        .get::<BoundaryFailure>()
        .filter(|failure| failure.kind == BoundaryKind::Auth)
        .cloned();

    if let Some(failure) = auth_failure {
        let href = state.guard.login_redirect(&path, query.as_deref());
        response = boundary_response(StatusCode::UNAUTHORIZED, failure, Some(href));
        append_set_cookie(&mut response, state.session_cookie().expire());
    } else if lookup.is_stale() && !sets_cookie(&response, &state.config.session.cookie_name) {
        append_set_cookie(&mut response, state.session_cookie().expire());
    }

    response
}

/// 핸들러가 이미 같은 이름의 쿠키를 설정했는지 확인.
fn sets_cookie(response: &Response, name: &str) -> bool {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}
