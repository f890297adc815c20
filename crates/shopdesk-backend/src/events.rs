//! 인증 실패 브로드캐스트.
//!
//! 데이터 접근 중 401/403을 받으면 [`AuthFailureBus`]로 이벤트를 발행하고,
//! 전역 리스너 하나가 세션 정리를 수행합니다.
//!
//! 같은 세션에서 동시에 여러 호출이 실패해도 로그아웃은 한 번만 일어나도록
//! 세션 키별 in-flight 플래그를 두고, 일정 시간 후 플래그를 해제합니다.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 인증 실패 이벤트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    /// 실패한 세션의 토큰 지문
    pub session_key: String,
    /// 백엔드 응답 상태 (401 또는 403)
    pub status: u16,
    /// 실패 사유 (백엔드 메시지)
    pub reason: String,
    /// 발생 시각
    pub at: DateTime<Utc>,
}

impl AuthFailure {
    pub fn new(session_key: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            status,
            reason: reason.into(),
            at: Utc::now(),
        }
    }
}

/// 인증 실패 이벤트 버스.
#[derive(Clone)]
pub struct AuthFailureBus {
    sender: broadcast::Sender<AuthFailure>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    reset_after: Duration,
}

impl AuthFailureBus {
    /// 새 이벤트 버스 생성.
    ///
    /// # Arguments
    /// * `capacity` - 브로드캐스트 채널 용량
    /// * `reset_after` - in-flight 플래그 해제까지의 시간
    pub fn new(capacity: usize, reset_after: Duration) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            reset_after,
        }
    }

    /// 이벤트 구독.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthFailure> {
        self.sender.subscribe()
    }

    /// 인증 실패 발행.
    ///
    /// 같은 세션에 대해 이미 처리 중인 로그아웃이 있으면 발행하지 않고 `false`를 반환합니다.
    /// tokio 런타임 안에서 호출되어야 합니다.
    pub fn publish(&self, failure: AuthFailure) -> bool {
        let key = failure.session_key.clone();
        {
            let mut in_flight = match self.in_flight.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if !in_flight.insert(key.clone()) {
                debug!(session = %key, "Auth failure already in flight, suppressed");
                return false;
            }
        }

        if self.sender.send(failure).is_err() {
            warn!(session = %key, "Auth failure published with no listener attached");
        }

        let in_flight = Arc::clone(&self.in_flight);
        let reset_after = self.reset_after;
        tokio::spawn(async move {
            tokio::time::sleep(reset_after).await;
            if let Ok(mut guard) = in_flight.lock() {
                guard.remove(&key);
            }
        });

        true
    }

    /// 해당 세션의 로그아웃이 처리 중인지 확인.
    pub fn is_in_flight(&self, session_key: &str) -> bool {
        self.in_flight
            .lock()
            .map(|guard| guard.contains(session_key))
            .unwrap_or(false)
    }
}

/// 인증 실패 시 세션 정리를 수행하는 핸들러.
#[async_trait]
pub trait LogoutHandler: Send + Sync {
    async fn on_auth_failure(&self, failure: &AuthFailure);
}

/// 전역 인증 실패 리스너 시작.
///
/// `cancel`이 취소되거나 버스가 닫힐 때까지 이벤트를 처리합니다.
pub fn spawn_auth_failure_listener(
    bus: &AuthFailureBus,
    handler: Arc<dyn LogoutHandler>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();

    tokio::spawn(async move {
        info!("Auth failure listener started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = receiver.recv() => match received {
                    Ok(failure) => {
                        info!(
                            session = %failure.session_key,
                            status = failure.status,
                            "Auth failure received, clearing session"
                        );
                        handler.on_auth_failure(&failure).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Auth failure listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
        info!("Auth failure listener stopped");
    })
}
