//! HTTP 메트릭 미들웨어.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::metrics::{record_http_duration, record_http_request, record_http_response, HttpLabels};
use crate::state::AppState;

/// 요청마다 카운터와 처리 시간을 기록합니다.
///
/// 라벨: method, 정규화된 경로, 라우트 가드 분류(`route_class`).
pub async fn track_http_metrics(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    let labels = HttpLabels::new(
        request.method().as_str(),
        path,
        state.guard.table().classify(path),
    );
    record_http_request(&labels);

    let started = Instant::now();
    let response = next.run(request).await;

    record_http_response(&labels, response.status());
    record_http_duration(&labels, started.elapsed());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use crate::state::create_test_state;

    #[tokio::test]
    async fn test_tracked_routes_pass_through() {
        let state = create_test_state("http://127.0.0.1:9").unwrap();
        let app = Router::new()
            .route("/users/{id}", get(|| async { "user" }))
            .layer(middleware::from_fn_with_state(state, track_http_metrics));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/users/65f1c2a9e4b0a1b2c3d4e5f6")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
