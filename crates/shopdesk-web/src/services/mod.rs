//! 백그라운드 서비스.

pub mod auth_listener;

pub use auth_listener::start_auth_failure_listener;
