//! Prometheus metrics: HTTP request metrics plus a handful of auth counters.
//!
//! Counters are recorded through the `metrics` facade, so they are no-ops
//! until [`init_metrics`] installs the Prometheus recorder.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};

pub use metrics_exporter_prometheus::PrometheusHandle as MetricsHandle;

/// Installs the global Prometheus recorder and spawns its upkeep task.
///
/// Returns `None` if a recorder is already installed. Must be called from
/// within a Tokio runtime.
pub fn init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("wayfare_http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )
        .ok()?
        .install_recorder()
        .map_err(|e| tracing::warn!(error = %e, "Prometheus recorder not installed"))
        .ok()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

/// Records request count and latency per method, matched path and status.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!("wayfare_http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("wayfare_http_request_duration_seconds", "method" => method, "path" => path)
        .record(start.elapsed().as_secs_f64());

    response
}

pub fn track_user_created(role: &str) {
    counter!("wayfare_users_created_total", "role" => role.to_string()).increment(1);
}

pub fn track_login(outcome: &'static str) {
    counter!("wayfare_logins_total", "outcome" => outcome).increment(1);
}

pub fn track_tokens_issued(kind: &'static str) {
    counter!("wayfare_tokens_issued_total", "kind" => kind).increment(1);
}

pub fn track_driver_review(decision: &'static str) {
    counter!("wayfare_driver_reviews_total", "decision" => decision).increment(1);
}
