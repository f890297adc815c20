//! Shopdesk 관리자 게이트웨이.
//!
//! 세션 쿠키 발급, 라우트 가드, 대시보드 페이지 핸들러를 제공합니다.
//!
//! # 요청 흐름
//!
//! 요청 → 라우트 가드(세션 쿠키 해제, 경로 분류) → 페이지 핸들러([`auth::CurrentSession`])
//! → 백엔드 데이터 접근 → JSON 뷰 렌더링

pub mod auth;
pub mod error;
pub mod extract;
pub mod guard;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiEnvelope, BoundaryKind, PageError, PageResult};
pub use routes::create_router;
pub use state::AppState;
