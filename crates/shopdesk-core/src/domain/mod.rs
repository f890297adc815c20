//! 관리자 대시보드 도메인 모델.

mod catalog;
mod commerce;
mod role;
mod session;

pub use catalog::*;
pub use commerce::*;
pub use role::*;
pub use session::*;
