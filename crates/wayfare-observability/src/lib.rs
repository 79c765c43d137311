//! # Wayfare Observability
//!
//! - [`logging`]: `tracing-subscriber` setup and HTTP request logging
//! - [`metrics`]: Prometheus recorder, HTTP metrics middleware, auth counters

pub mod logging;
pub mod metrics;

pub use self::logging::{LogConfig, LogFormat, init_logging, logging_middleware};
pub use self::metrics::{
    MetricsHandle, init_metrics, metrics_middleware, track_driver_review, track_login,
    track_tokens_issued, track_user_created,
};
