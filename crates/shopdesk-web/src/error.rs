//! 페이지 에러 경계.
//!
//! 페이지 핸들러는 [`PageError`]를 반환하고, `IntoResponse`가 메시지를 분류해
//! 응답을 만듭니다.
//!
//! - 메시지에 "token", "unauthorized", "session"이 들어 있으면 (대소문자 무시) 인증 에러:
//!   `401` + `action: "relogin"` + 로그인 링크, 세션 쿠키 삭제
//! - 그 밖의 에러: 종류별 상태 코드 + `action: "retry"`
//!
//! 로그인 링크의 `next`와 쿠키 삭제는 라우트 가드 미들웨어가 응답 확장값
//! [`BoundaryFailure`]를 보고 채웁니다.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use shopdesk_backend::BackendError;
use thiserror::Error;
use tracing::{error, warn};

/// 페이지 핸들러 Result 타입.
pub type PageResult<T> = Result<T, PageError>;

/// 페이지 에러.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("A valid session is required")]
    Unauthenticated,

    #[error("{}", .0.user_message())]
    Backend(#[from] BackendError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

/// 에러 경계 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    /// 재로그인이 필요한 에러
    Auth,
    /// 재시도 가능한 일반 에러
    Generic,
}

impl BoundaryKind {
    /// 메시지로 에러 분류.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if ["token", "unauthorized", "session"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            Self::Auth
        } else {
            Self::Generic
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::Auth => "relogin",
            Self::Generic => "retry",
        }
    }
}

/// 응답 확장값으로 전달되는 에러 경계 정보.
#[derive(Debug, Clone)]
pub struct BoundaryFailure {
    pub kind: BoundaryKind,
    pub code: &'static str,
    pub message: String,
}

/// 에러 경계 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub action: BoundaryAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// 사용자에게 권하는 다음 동작.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryAction {
    Relogin,
    Retry,
}

impl From<BoundaryKind> for BoundaryAction {
    fn from(kind: BoundaryKind) -> Self {
        match kind {
            BoundaryKind::Auth => Self::Relogin,
            BoundaryKind::Generic => Self::Retry,
        }
    }
}

/// 성공 응답 봉투 (`{ success: true, data }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl PageError {
    /// 에러 경계 분류.
    pub fn kind(&self) -> BoundaryKind {
        match self {
            PageError::Unauthenticated => BoundaryKind::Auth,
            PageError::Backend(e) if e.is_auth_error() => BoundaryKind::Auth,
            other => BoundaryKind::classify(&other.to_string()),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            PageError::Unauthenticated => "UNAUTHENTICATED",
            PageError::Backend(BackendError::Unauthorized { .. }) => "SESSION_EXPIRED",
            PageError::Backend(BackendError::Network(_) | BackendError::Timeout) => {
                "BACKEND_UNAVAILABLE"
            }
            PageError::Backend(_) => "BACKEND_ERROR",
            PageError::Validation(_) => "VALIDATION_ERROR",
            PageError::NotFound(_) => "NOT_FOUND",
            PageError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            PageError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PageError::Backend(e) => {
                StatusCode::from_u16(e.status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            PageError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 에러 경계 응답 생성.
///
/// 인증 에러는 항상 `401`로 응답합니다.
pub fn boundary_response(
    status: StatusCode,
    failure: BoundaryFailure,
    href: Option<String>,
) -> Response {
    let status = match failure.kind {
        BoundaryKind::Auth => StatusCode::UNAUTHORIZED,
        BoundaryKind::Generic => status,
    };
    let body = BoundaryBody {
        success: false,
        code: failure.code.to_string(),
        message: failure.message.clone(),
        action: failure.kind.into(),
        href,
    };

    let mut response = (status, Json(body)).into_response();
    response.extensions_mut().insert(failure);
    response
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = self.status();
        let message = self.to_string();

        match (&self, kind) {
            (PageError::Internal(detail), _) => error!(detail = %detail, "Page handler failed"),
            (_, BoundaryKind::Auth) => warn!(%message, "Auth failure reached error boundary"),
            _ => warn!(status = status.as_u16(), %message, "Page handler returned error"),
        }

        let href = match kind {
            BoundaryKind::Auth => Some("/login".to_string()),
            BoundaryKind::Generic => None,
        };
        let failure = BoundaryFailure {
            kind,
            code: self.code(),
            message,
        };
        boundary_response(status, failure, href)
    }
}

/// 핸들러 패닉을 일반 에러 경계 응답으로 변환 (`CatchPanicLayer`용).
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%detail, "Handler panicked");

    let failure = BoundaryFailure {
        kind: BoundaryKind::Generic,
        code: "INTERNAL_ERROR",
        message: "Something went wrong".to_string(),
    };
    boundary_response(StatusCode::INTERNAL_SERVER_ERROR, failure, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> BoundaryBody {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_classify_messages() {
        assert_eq!(BoundaryKind::classify("jwt Token expired"), BoundaryKind::Auth);
        assert_eq!(BoundaryKind::classify("UNAUTHORIZED access"), BoundaryKind::Auth);
        assert_eq!(BoundaryKind::classify("Your session has expired"), BoundaryKind::Auth);
        assert_eq!(BoundaryKind::classify("Product not found"), BoundaryKind::Generic);
        assert_eq!(BoundaryKind::classify(""), BoundaryKind::Generic);
    }

    #[test]
    fn test_kind_from_variant() {
        assert_eq!(PageError::Unauthenticated.kind(), BoundaryKind::Auth);
        let expired = PageError::Backend(BackendError::Unauthorized {
            status: 403,
            message: "forbidden".to_string(),
        });
        assert_eq!(expired.kind(), BoundaryKind::Auth);
        assert_eq!(
            PageError::Validation("name is required".to_string()).kind(),
            BoundaryKind::Generic
        );
        // 메시지 기반 분류
        assert_eq!(
            PageError::Internal("missing token".to_string()).kind(),
            BoundaryKind::Auth
        );
    }

    #[tokio::test]
    async fn test_auth_error_response() {
        let response = PageError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.extensions().get::<BoundaryFailure>().is_some());

        let body = body_of(response).await;
        assert!(!body.success);
        assert_eq!(body.action, BoundaryAction::Relogin);
        assert_eq!(body.href.as_deref(), Some("/login"));
    }

    #[tokio::test]
    async fn test_backend_api_error_keeps_status_and_message() {
        let response = PageError::Backend(BackendError::Api {
            status: 409,
            message: "SKU already exists".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_of(response).await;
        assert_eq!(body.message, "SKU already exists");
        assert_eq!(body.action, BoundaryAction::Retry);
        assert!(body.href.is_none());
    }

    #[tokio::test]
    async fn test_network_error_hides_transport_detail() {
        let response =
            PageError::Backend(BackendError::Network("tcp connect error 10.0.0.1".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_of(response).await;
        assert!(!body.message.contains("10.0.0.1"));
        assert_eq!(body.code, "BACKEND_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_panic_response_is_generic() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.action, BoundaryAction::Retry);
        assert_eq!(body.message, "Something went wrong");
    }
}
