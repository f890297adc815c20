//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 가드/로그인 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use std::time::Duration;

use axum::http::StatusCode;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use crate::guard::RouteClass;

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # Errors
///
/// 레코더가 이미 설치되어 있으면 실패합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 메트릭 라벨.
///
/// 경로는 [`normalize_path`]로 정규화하고, 라우트 가드 분류를 함께 붙입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpLabels {
    pub method: String,
    pub path: String,
    pub route_class: &'static str,
}

impl HttpLabels {
    pub fn new(method: &str, path: &str, class: RouteClass) -> Self {
        Self {
            method: method.to_string(),
            path: normalize_path(path),
            route_class: class.as_str(),
        }
    }
}

/// HTTP 요청 카운터 증가.
pub fn record_http_request(labels: &HttpLabels) {
    counter!(
        "http_requests_total",
        "method" => labels.method.clone(),
        "path" => labels.path.clone(),
        "route_class" => labels.route_class
    )
    .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(labels: &HttpLabels, status: StatusCode) {
    counter!(
        "http_responses_total",
        "method" => labels.method.clone(),
        "path" => labels.path.clone(),
        "route_class" => labels.route_class,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(labels: &HttpLabels, elapsed: Duration) {
    histogram!(
        "http_request_duration_seconds",
        "method" => labels.method.clone(),
        "route_class" => labels.route_class
    )
    .record(elapsed.as_secs_f64());
}

// ============================================================================
// 세션 메트릭 헬퍼 함수
// ============================================================================

/// 라우트 가드 결정 카운터 증가.
pub fn record_guard_decision(decision: &'static str) {
    counter!("route_guard_decisions_total", "decision" => decision).increment(1);
}

/// 로그인 시도 결과 카운터 증가.
pub fn record_login(method: &'static str, outcome: &'static str) {
    counter!("session_logins_total", "method" => method, "outcome" => outcome).increment(1);
}

/// 인증 실패로 폐기된 세션 카운터 증가.
pub fn record_session_revoked() {
    counter!("session_revocations_total").increment(1);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 동적 파라미터를 정규화합니다.
///
/// 예: `/products/65f1c2a9e4b0a1b2c3d4e5f6` → `/products/:id`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let is_uuid = segment.len() == 36 && segment.chars().filter(|c| *c == '-').count() == 4;
            let is_numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());
            // 백엔드 문서 ID (24자리 16진수)
            let is_object_id = segment.len() == 24 && segment.chars().all(|c| c.is_ascii_hexdigit());

            if is_uuid || is_numeric || is_object_id {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_object_id() {
        assert_eq!(
            normalize_path("/products/65f1c2a9e4b0a1b2c3d4e5f6"),
            "/products/:id"
        );
    }

    #[test]
    fn test_normalize_path_uuid() {
        let path = "/orders/123e4567-e89b-12d3-a456-426614174000";
        assert_eq!(normalize_path(path), "/orders/:id");
    }

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/orders/12345"), "/orders/:id");
    }

    #[test]
    fn test_normalize_path_no_params() {
        assert_eq!(normalize_path("/products"), "/products");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_http_labels_carry_route_class() {
        let labels = HttpLabels::new("GET", "/users/65f1c2a9e4b0a1b2c3d4e5f6", RouteClass::Admin);
        assert_eq!(labels.path, "/users/:id");
        assert_eq!(labels.route_class, "admin");
    }

    #[test]
    fn test_normalize_path_keeps_slugs() {
        assert_eq!(normalize_path("/categories/summer-sale"), "/categories/summer-sale");
    }
}
