//! # Shopdesk Core
//!
//! 관리자 게이트웨이의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! 이 크레이트는 게이트웨이 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자 역할 및 세션
//! - 백엔드 리소스 모델 (상품, 카테고리, 브랜드, 주문 등)
//! - 설정 관리
//! - 로깅 인프라
//! - 세션 쿠키 서명/암호화

pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use crypto::{CryptoError, SessionSealer};
pub use domain::*;
pub use error::*;
pub use logging::*;
