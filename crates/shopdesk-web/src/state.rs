//! 모든 핸들러에서 공유되는 애플리케이션 상태.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use shopdesk_backend::{AuthFailureBus, BackendClient, SessionIssuer};
use shopdesk_core::{AppConfig, CoreError, CoreResult, CryptoError, Session, SessionSealer};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::auth::{read_cookie, CookieBuilder, RevocationList};
use crate::guard::{RouteGuard, RouteTable};
use crate::services::start_auth_failure_listener;

/// 요청 쿠키로 찾은 세션 상태.
#[derive(Debug, Clone)]
pub enum SessionLookup {
    /// 쿠키 없음
    Missing,
    /// 쿠키가 있지만 해제 실패, 만료, 폐기됨 (쿠키 삭제 대상)
    Stale,
    /// 유효한 세션
    Valid(Session),
}

impl SessionLookup {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionLookup::Valid(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, SessionLookup::Stale)
    }
}

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 `Arc<AppState>`로 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 로드된 설정
    pub config: Arc<AppConfig>,
    /// 백엔드 REST 클라이언트 (인증 실패 버스 연결됨)
    pub backend: BackendClient,
    /// 자격증명/oauth 세션 발급기
    pub issuer: SessionIssuer,
    /// 세션 쿠키 봉인기
    pub sealer: SessionSealer,
    /// 라우트 가드
    pub guard: RouteGuard,
    /// 폐기된 세션 목록
    pub revocations: RevocationList,
    /// 인증 실패 이벤트 버스
    pub auth_failures: AuthFailureBus,
    /// 서버 버전
    pub version: String,
    /// 서버 시작 시간
    pub started_at: chrono::DateTime<Utc>,
}

impl AppState {
    /// 설정으로 상태 구성.
    ///
    /// # Errors
    /// 세션 시크릿이 짧거나 HTTP 클라이언트를 만들 수 없으면 실패합니다.
    pub fn new(config: AppConfig) -> CoreResult<Self> {
        let sealer = SessionSealer::new(&config.session.secret())?;

        let auth_failures = AuthFailureBus::new(
            config.auth_failure.channel_capacity,
            StdDuration::from_millis(config.auth_failure.reset_ms),
        );

        let backend = BackendClient::new(&config.backend)
            .map_err(|e| CoreError::Config(format!("backend client: {e}")))?
            .with_auth_failure_bus(auth_failures.clone());

        let ttl = Duration::days(config.session.ttl_days);
        let issuer = SessionIssuer::new(backend.clone(), ttl);
        let guard = RouteGuard::new(RouteTable::new(config.routes.clone()));

        Ok(Self {
            config: Arc::new(config),
            backend,
            issuer,
            sealer,
            guard,
            revocations: RevocationList::new(ttl),
            auth_failures,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        })
    }

    /// 세션 쿠키 빌더.
    pub fn session_cookie(&self) -> CookieBuilder<'_> {
        CookieBuilder::new(&self.config.session.cookie_name, self.config.session.secure_cookie)
    }

    /// oauth 핸드오프 쿠키 빌더.
    pub fn oauth_cookie(&self) -> CookieBuilder<'_> {
        CookieBuilder::new(
            &self.config.session.oauth_cookie_name,
            self.config.session.secure_cookie,
        )
    }

    /// 세션 쿠키 수명 (초).
    pub fn session_max_age(&self) -> i64 {
        Duration::days(self.config.session.ttl_days).num_seconds()
    }

    /// 세션을 봉인해 `Set-Cookie` 값 생성.
    pub fn issue_session_cookie(&self, session: &Session) -> Result<String, CryptoError> {
        let sealed = self.sealer.seal(session)?;
        Ok(self.session_cookie().issue(&sealed, self.session_max_age()))
    }

    /// 요청 헤더에서 세션 해제.
    ///
    /// 해제 실패, 만료, 폐기된 세션은 모두 "세션 없음"으로 취급합니다.
    pub async fn resolve_session(&self, headers: &HeaderMap) -> SessionLookup {
        let Some(value) = read_cookie(headers, &self.config.session.cookie_name) else {
            return SessionLookup::Missing;
        };

        let session = match self.sealer.open(&value) {
            Ok(session) => session,
            Err(e) => {
                debug!(error = %e, "Discarding undecodable session cookie");
                return SessionLookup::Stale;
            }
        };

        if self.revocations.is_revoked(&session.fingerprint()).await {
            debug!(user = %session.user.user_id, "Discarding revoked session");
            return SessionLookup::Stale;
        }

        SessionLookup::Valid(session)
    }

    /// 인증 실패 리스너 시작.
    pub fn start_auth_failure_listener(&self, shutdown: CancellationToken) -> JoinHandle<()> {
        start_auth_failure_listener(&self.auth_failures, self.revocations.clone(), shutdown)
    }

    /// 서버 가동 시간 (초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 상태 생성.
///
/// 주어진 백엔드 주소와 고정 시크릿을 사용합니다.
pub fn create_test_state(backend_url: &str) -> CoreResult<Arc<AppState>> {
    let mut config = AppConfig::default();
    config.backend.base_url = backend_url.to_string();
    config.session.secret = "test-session-secret-with-at-least-32-bytes".to_string();
    config.auth_failure.reset_ms = 200;
    Ok(Arc::new(AppState::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;
    use shopdesk_core::{Role, UserProfile};

    fn profile() -> UserProfile {
        UserProfile {
            user_id: "u-7".to_string(),
            email: "vendor@example.com".to_string(),
            username: "vendor".to_string(),
            first_name: "Vera".to_string(),
            last_name: "Vendor".to_string(),
            role: Role::Vendor,
            email_verified: true,
        }
    }

    fn cookie_headers(state: &AppState, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let cookie = format!("{}={}", state.config.session.cookie_name, value);
        headers.insert(COOKIE, HeaderValue::from_str(&cookie).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_resolve_session_states() {
        let state = create_test_state("http://localhost:8080").unwrap();
        assert!(matches!(
            state.resolve_session(&HeaderMap::new()).await,
            SessionLookup::Missing
        ));

        let garbage = cookie_headers(&state, "not-a-session");
        assert!(state.resolve_session(&garbage).await.is_stale());

        let session = state.issuer.build_session(profile(), "backend-token".to_string());
        let sealed = state.sealer.seal(&session).unwrap();
        let headers = cookie_headers(&state, &sealed);

        let resolved = state.resolve_session(&headers).await;
        assert_eq!(resolved.session().map(|s| s.role()), Some(Role::Vendor));

        state.revocations.revoke(&session.fingerprint()).await;
        assert!(state.resolve_session(&headers).await.is_stale());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let mut config = AppConfig::default();
        config.session.secret = "short".to_string();
        assert!(matches!(AppState::new(config), Err(CoreError::Session(_))));
    }

    #[test]
    fn test_issue_session_cookie() {
        let state = create_test_state("http://localhost:8080").unwrap();
        let session = state.issuer.build_session(profile(), "t".to_string());
        let cookie = state.issue_session_cookie(&session).unwrap();
        assert!(cookie.starts_with("shopdesk.session-token="));
        assert!(cookie.contains(&format!("Max-Age={}", 30 * 24 * 3600)));
    }
}
