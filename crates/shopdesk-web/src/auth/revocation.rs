//! 폐기된 세션 목록.
//!
//! 인증 실패 리스너가 세션의 토큰 지문을 등록하면, 라우트 가드는 해당 쿠키를
//! "세션 없음"으로 취급하고 쿠키를 삭제합니다.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use shopdesk_backend::{AuthFailure, LogoutHandler};
use tokio::sync::RwLock;
use tracing::info;

use crate::metrics::record_session_revoked;

/// 폐기된 세션 지문 목록.
#[derive(Clone)]
pub struct RevocationList {
    revoked: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
    retain_for: Duration,
}

impl RevocationList {
    /// # Arguments
    /// * `retain_for` - 폐기 기록 유지 기간 (세션 TTL 이상이어야 함)
    pub fn new(retain_for: Duration) -> Self {
        Self {
            revoked: Arc::new(RwLock::new(HashMap::new())),
            retain_for,
        }
    }

    /// 세션 지문 폐기.
    pub async fn revoke(&self, fingerprint: &str) {
        let until = Utc::now() + self.retain_for;
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, expires| *expires > Utc::now());
        revoked.insert(fingerprint.to_string(), until);
    }

    /// 폐기 여부.
    pub async fn is_revoked(&self, fingerprint: &str) -> bool {
        self.revoked
            .read()
            .await
            .get(fingerprint)
            .is_some_and(|until| *until > Utc::now())
    }

    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LogoutHandler for RevocationList {
    async fn on_auth_failure(&self, failure: &AuthFailure) {
        self.revoke(&failure.session_key).await;
        record_session_revoked();
        info!(
            session = %failure.session_key,
            status = failure.status,
            "Session revoked after backend auth failure"
        );
    }
}
