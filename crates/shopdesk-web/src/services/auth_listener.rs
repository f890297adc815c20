//! 인증 실패 리스너 서비스.
//!
//! 백엔드 401/403 이벤트를 받아 해당 세션을 폐기 목록에 등록합니다.
//! 다음 요청에서 라우트 가드가 쿠키를 삭제하고 로그인으로 보냅니다.

use std::sync::Arc;

use shopdesk_backend::{spawn_auth_failure_listener, AuthFailureBus, LogoutHandler};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::auth::RevocationList;

/// 전역 인증 실패 리스너 시작.
///
/// # Arguments
/// * `bus` - 인증 실패 이벤트 버스
/// * `revocations` - 세션 폐기 목록
/// * `shutdown` - 종료 토큰
pub fn start_auth_failure_listener(
    bus: &AuthFailureBus,
    revocations: RevocationList,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let handler: Arc<dyn LogoutHandler> = Arc::new(revocations);
    spawn_auth_failure_listener(bus, handler, shutdown)
}
