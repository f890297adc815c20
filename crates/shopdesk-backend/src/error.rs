//! 백엔드 호출 에러 타입.

use thiserror::Error;

/// 백엔드 호출 에러.
///
/// 모든 데이터 접근 함수는 이 타입 하나로 실패를 보고합니다.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// 네트워크/연결 에러 (백엔드 도달 불가)
    #[error("Backend unreachable: {0}")]
    Network(String),

    /// 요청 타임아웃
    #[error("Backend request timed out")]
    Timeout,

    /// 인증 만료 또는 권한 없음 (401/403)
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// 2xx가 아닌 응답 또는 `success: false`
    #[error("Backend error {status}: {message}")]
    Api { status: u16, message: String },

    /// 응답 형식이 기대한 스키마와 다름
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

/// 백엔드 호출 Result 타입.
pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    /// 인증 실패(401/403)인지 확인.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, BackendError::Unauthorized { .. })
    }

    /// 백엔드에 도달하지 못한 에러인지 확인.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, BackendError::Network(_) | BackendError::Timeout)
    }

    /// 화면에 노출할 메시지.
    ///
    /// 전송 계층 세부 정보는 숨기고 백엔드가 보낸 메시지만 전달합니다.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Network(_) | BackendError::Timeout => {
                "Service is temporarily unavailable".to_string()
            }
            BackendError::Unauthorized { .. } => "Your session has expired".to_string(),
            BackendError::Api { message, .. } => message.clone(),
            BackendError::Decode(_) => "Unexpected response from server".to_string(),
        }
    }

    /// 대응하는 HTTP 상태 코드.
    pub fn status(&self) -> u16 {
        match self {
            BackendError::Network(_) => 502,
            BackendError::Timeout => 504,
            BackendError::Unauthorized { status, .. } | BackendError::Api { status, .. } => {
                *status
            }
            BackendError::Decode(_) => 502,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}
