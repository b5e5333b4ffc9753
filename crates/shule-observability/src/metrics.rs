use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::logging::is_observability_enabled;

/// Session calls stay in memory; only commits wait on the school backend.
const REQUEST_BUCKETS: &[f64] = &[0.001, 0.005, 0.025, 0.1, 0.5];
const COMMIT_BUCKETS: &[f64] = &[0.05, 0.25, 1.0, 2.5, 10.0];

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `None` when observability is disabled or a recorder is already
/// installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            REQUEST_BUCKETS,
        )
        .and_then(|builder| {
            builder.set_buckets_for_metric(
                Matcher::Full("structure_commit_duration_seconds".to_string()),
                COMMIT_BUCKETS,
            )
        })
        .and_then(|builder| builder.install_recorder())
        .inspect_err(|e| warn!(error = %e, "Prometheus recorder not installed"))
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

/// Route template for a request. Unmatched paths share one label so session
/// ids never become label values.
fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_owned(), |p| p.as_str().to_owned())
}

/// Counts requests and records their latency per route.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let route = route_label(&req);

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!("http_requests_total", "method" => method, "route" => route.clone(), "status" => status)
        .increment(1);
    histogram!("http_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());

    response
}

/// Router exposing `/metrics`.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// Count a structural intent by outcome: `accepted`, `rejected` or `malformed`.
pub fn track_intent(outcome: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("structure_intents_total", "outcome" => outcome).increment(1);
}

/// Count a commit attempt by status, e.g. `committed` or `backend_rejected`,
/// and record how long it took.
pub fn track_commit(status: &'static str, elapsed: Duration) {
    if !is_observability_enabled() {
        return;
    }
    counter!("structure_commits_total", "status" => status).increment(1);
    histogram!("structure_commit_duration_seconds", "status" => status)
        .record(elapsed.as_secs_f64());
}
