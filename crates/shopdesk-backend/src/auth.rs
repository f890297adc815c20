//! 세션 발급.
//!
//! 처리 기능:
//! - 자격증명 교환 (POST /api/v1/auth/login)
//! - oauth 핸드오프: 서명된 쿠키에 담긴 사전 검증 토큰으로 세션 생성
//!
//! 두 경로 모두 [`SessionIssuer::build_session`]에서 같은 방식으로 세션을 만듭니다.

use chrono::Duration;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shopdesk_core::{CryptoError, Session, SessionSealer, UserProfile};
use thiserror::Error;
use tracing::{info, warn};

use crate::client::BackendClient;
use crate::error::BackendError;

/// 로그인 엔드포인트.
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// 자격증명이 틀렸을 때 화면에 보여줄 일반 메시지.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email/username or password";

/// 세션 발급 에러.
///
/// 백엔드 내부 에러는 노출하지 않고 메시지 문자열만 전달합니다.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// 잘못된 자격증명
    #[error("{0}")]
    InvalidCredentials(String),

    /// 백엔드에 도달하지 못함
    #[error("Login service unavailable")]
    BackendUnavailable,

    /// oauth 토큰이 손상되었거나 만료됨
    #[error("Invalid sign-in token")]
    InvalidOAuthToken,
}

/// 로그인 자격증명.
pub struct Credentials {
    /// 이메일 또는 사용자 이름
    pub identifier: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// 백엔드 로그인 응답 데이터.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    /// 백엔드가 발급한 Bearer 토큰
    #[serde(alias = "token", alias = "access_token")]
    pub access_token: String,
    /// 사용자 정보
    pub user: UserProfile,
}

/// oauth 핸드오프 쿠키의 클레임.
///
/// 외부 로그인 콜백이 세션 시크릿으로 서명해 전달합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthClaims {
    /// 사전 검증된 백엔드 Bearer 토큰
    pub access_token: String,
    /// 사용자 정보
    pub user: UserProfile,
    /// 만료 시각 (Unix timestamp)
    pub exp: i64,
}

/// 세션 발급기.
#[derive(Clone)]
pub struct SessionIssuer {
    client: BackendClient,
    ttl: Duration,
}

impl SessionIssuer {
    /// 새 세션 발급기 생성.
    ///
    /// # Arguments
    /// * `client` - 백엔드 클라이언트
    /// * `ttl` - 발급되는 세션의 유효 기간
    pub fn new(client: BackendClient, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    /// 자격증명을 백엔드와 교환하여 세션 발급.
    ///
    /// # Errors
    /// - 백엔드가 4xx로 거부하면 `AuthError::InvalidCredentials` (항상 일반 메시지)
    /// - 백엔드에 도달하지 못하거나 5xx/해석 불가 응답이면 `AuthError::BackendUnavailable`
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let body = json!({
            "identifier": credentials.identifier,
            "password": credentials.password.expose_secret(),
        });

        let grant: LoginGrant = self
            .client
            .send_json(Method::POST, LOGIN_PATH, &body, None)
            .await
            .map_err(|e| {
                warn!(identifier = %credentials.identifier, error = %e, "Login rejected");
                match e {
                    e if e.is_unreachable() => AuthError::BackendUnavailable,
                    BackendError::Decode(_) => AuthError::BackendUnavailable,
                    BackendError::Api { status, .. } if status >= 500 => {
                        AuthError::BackendUnavailable
                    }
                    // 백엔드 메시지는 로그에만 남김
                    _ => AuthError::InvalidCredentials(INVALID_CREDENTIALS_MESSAGE.to_string()),
                }
            })?;

        let session = self.build_session(grant.user, grant.access_token);
        info!(
            user = %session.user.user_id,
            role = %session.role(),
            "Session issued via credentials"
        );
        Ok(session)
    }

    /// oauth 핸드오프 쿠키 값으로 세션 발급.
    ///
    /// 토큰은 이미 검증된 것으로 간주하며 백엔드를 호출하지 않습니다.
    pub fn from_oauth_token(&self, sealer: &SessionSealer, token: &str) -> Result<Session, AuthError> {
        let claims: OAuthClaims = sealer.verify(token).map_err(|e| {
            match e {
                CryptoError::Expired => warn!("Expired oauth hand-off token"),
                _ => warn!(error = %e, "Malformed oauth hand-off token"),
            }
            AuthError::InvalidOAuthToken
        })?;

        if claims.access_token.trim().is_empty() {
            return Err(AuthError::InvalidOAuthToken);
        }

        let session = self.build_session(claims.user, claims.access_token);
        info!(
            user = %session.user.user_id,
            role = %session.role(),
            "Session issued via oauth hand-off"
        );
        Ok(session)
    }

    /// 사용자 정보와 Bearer 토큰으로 세션 구성.
    pub fn build_session(&self, user: UserProfile, access_token: String) -> Session {
        Session::new(user, access_token, self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_core::{BackendConfig, Role};

    fn issuer() -> SessionIssuer {
        let client = BackendClient::new(&BackendConfig::default()).unwrap();
        SessionIssuer::new(client, Duration::days(1))
    }

    fn sealer() -> SessionSealer {
        SessionSealer::new(&SecretString::from(
            "oauth-test-secret-0123456789abcdefghijkl".to_string(),
        ))
        .unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            user_id: "u-7".to_string(),
            email: "ops@shop.io".to_string(),
            username: "ops".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Admin,
            email_verified: true,
        }
    }

    #[test]
    fn test_oauth_token_builds_session() {
        let sealer = sealer();
        let claims = OAuthClaims {
            access_token: "pre-verified".to_string(),
            user: profile(),
            exp: chrono::Utc::now().timestamp() + 60,
        };
        let token = sealer.sign(&claims).unwrap();

        let session = issuer().from_oauth_token(&sealer, &token).unwrap();
        assert_eq!(session.access_token, "pre-verified");
        assert_eq!(session.role(), Role::Admin);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_malformed_oauth_token_rejected() {
        let result = issuer().from_oauth_token(&sealer(), "garbage.token.value");
        assert_eq!(result.unwrap_err(), AuthError::InvalidOAuthToken);
    }

    #[test]
    fn test_expired_oauth_token_rejected() {
        let sealer = sealer();
        let claims = OAuthClaims {
            access_token: "old".to_string(),
            user: profile(),
            exp: chrono::Utc::now().timestamp() - 120,
        };
        let token = sealer.sign(&claims).unwrap();

        assert_eq!(
            issuer().from_oauth_token(&sealer, &token).unwrap_err(),
            AuthError::InvalidOAuthToken
        );
    }

    #[test]
    fn test_login_grant_accepts_token_alias() {
        let json = r#"{
            "token": "abc",
            "user": {"id": "1", "email": "a@b.c", "username": "a", "role": "CUSTOMER"}
        }"#;
        let grant: LoginGrant = serde_json::from_str(json).unwrap();
        assert_eq!(grant.access_token, "abc");
    }
}
