//! 세션 추출기.
//!
//! 라우트 가드가 요청 확장값에 넣어 둔 [`Session`]을 핸들러에 명시적으로 전달합니다.
//!
//! ```rust,ignore
//! async fn dashboard(CurrentSession(session): CurrentSession) -> impl IntoResponse {
//!     format!("Hello, {}", session.user.display_name())
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shopdesk_core::Session;

use crate::error::PageError;

/// 현재 요청의 세션.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl CurrentSession {
    /// 백엔드 호출에 사용할 Bearer 토큰.
    pub fn token(&self) -> Option<&str> {
        Some(self.0.access_token.as_str())
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or(PageError::Unauthenticated)
    }
}
