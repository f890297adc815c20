//! 전자상거래 백엔드 REST API 연동.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - [`BackendClient`]: Bearer 토큰을 붙여 백엔드를 호출하는 HTTP 클라이언트
//! - [`SessionIssuer`]: 자격증명 교환 및 oauth 핸드오프로 세션 발급
//! - 리소스별 list/get/create/update/delete 함수 ([`resources`])
//! - [`AuthFailureBus`]: 401/403 응답을 전파하는 프로세스 단위 이벤트 버스

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod events;
pub mod resources;

pub use auth::{AuthError, Credentials, LoginGrant, OAuthClaims, SessionIssuer};
pub use client::BackendClient;
pub use envelope::{ListQuery, Paged};
pub use error::*;
pub use events::{spawn_auth_failure_listener, AuthFailure, AuthFailureBus, LogoutHandler};
pub use resources::*;
