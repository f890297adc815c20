//! 게이트웨이 공통 에러 타입.

use thiserror::Error;

use crate::crypto::CryptoError;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 값 검증 실패
    #[error("설정 에러: {0}")]
    Config(String),

    /// 설정 소스 로드 실패
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    /// 세션 봉인/해제 실패
    #[error("세션 에러: {0}")]
    Session(#[from] CryptoError),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
