//! Structured logging setup and the request logging middleware.
//!
//! # Configuration
//!
//! - `LOG_LEVEL`: level for the wayfare crates (default: `info`)
//! - `LOG_FORMAT`: `compact` (default) or `json`
//! - `LOG_DIR`: when set, also write daily-rotated JSON logs there
//! - `RUST_LOG`: overrides the console filter entirely

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<String>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match std::env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Compact,
            },
            dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    fn default_filter(&self) -> String {
        format!(
            "wayfare={level},wayfare_core={level},wayfare_auth={level},wayfare_db={level},tower_http=warn,hyper=warn,sqlx=warn,axum::rejection=trace",
            level = self.level
        )
    }
}

/// Installs the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(config: &LogConfig) {
    let console_filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter()))
    };

    let compact_layer = (config.format == LogFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(console_filter())
    });

    let json_layer = (config.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_filter(console_filter())
    });

    let file_layer = config.dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "wayfare.json");
        fmt::layer()
            .json()
            .with_writer(appender)
            .with_ansi(false)
            .with_filter(EnvFilter::new(config.default_filter()))
    });

    let result = tracing_subscriber::registry()
        .with(compact_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init();

    if result.is_ok() {
        info!(format = ?config.format, file_output = config.dir.is_some(), "Logging initialised");
    }
}

/// Logs one line when a request arrives and one when it completes, with the
/// level chosen by response status class.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %matched_path,
        "Incoming request"
    );

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status();

    match status.as_u16() {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            "Request completed"
        ),
    }

    response
}
