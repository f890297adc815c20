//! HTTP 미들웨어.

pub mod metrics;

pub use metrics::track_http_metrics;
