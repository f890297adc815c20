//! 인증 세션.
//!
//! 백엔드 자격증명 교환 이후 발급되는 세션과 그 안에 담기는 사용자 정보.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Role;

/// 세션에 저장되는 사용자 정보.
///
/// 백엔드 사용자 레코드에서 그대로 디코딩됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// 백엔드 사용자 ID
    #[serde(alias = "_id", alias = "id")]
    pub user_id: String,
    /// 이메일
    pub email: String,
    /// 사용자 이름
    pub username: String,
    /// 이름
    #[serde(default)]
    pub first_name: String,
    /// 성
    #[serde(default)]
    pub last_name: String,
    /// 역할
    pub role: Role,
    /// 이메일 인증 여부
    #[serde(default, alias = "isEmailVerified")]
    pub email_verified: bool,
}

impl UserProfile {
    /// 표시용 이름 ("이름 성", 비어 있으면 사용자 이름).
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// 인증 세션.
///
/// 쿠키에는 이 구조체가 그대로 JWT 클레임으로 직렬화된 뒤 암호화되어 저장됩니다.
/// `iat`/`exp` 필드명은 JWT 표준 클레임과 일치합니다.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// 사용자 정보
    #[serde(flatten)]
    pub user: UserProfile,
    /// 백엔드가 발급한 Bearer 토큰
    pub access_token: String,
    /// 발급 시각 (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// 만료 시각 (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Session {
    /// 새 세션 생성.
    pub fn new(user: UserProfile, access_token: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user,
            access_token: access_token.into(),
            issued_at: now.timestamp(),
            expires_at: (now + ttl).timestamp(),
        }
    }

    /// 세션 역할.
    pub fn role(&self) -> Role {
        self.user.role
    }

    /// 세션이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.expires_at
    }

    /// 토큰 식별용 지문 (SHA-256 앞 16자리 hex).
    ///
    /// 로그, 폐기 목록, 중복 로그아웃 방지 키로 사용되며 원본 토큰은 노출하지 않습니다.
    pub fn fingerprint(&self) -> String {
        token_fingerprint(&self.access_token)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Bearer 토큰 지문 계산.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..8])
}

#[cfg(test)]
pub(crate) fn sample_profile(role: Role) -> UserProfile {
    UserProfile {
        user_id: "u-1".to_string(),
        email: "kim@example.com".to_string(),
        username: "kim".to_string(),
        first_name: "Jiwoo".to_string(),
        last_name: "Kim".to_string(),
        role,
        email_verified: true,
    }
}
