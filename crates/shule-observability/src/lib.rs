//! Shule Observability
//!
//! Provides configurable observability features:
//! - Structured logging via `tracing`, compact or JSON
//! - Engine and HTTP metrics via Prometheus
//! - HTTP request/response logging
//!
//! The `observability` feature flag compiles the full stack in. At runtime it
//! can be switched off with `OBSERVABILITY_ENABLED=false`, which falls back to
//! plain console logging and no-op metrics.
//!
//! # Examples
//!
//! ```no_run
//! use shule_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     let _handle = init_metrics();
//!     // ... application code ...
//! }
//! ```

mod basic_logging;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use self::logging::{init_tracing, is_observability_enabled, logging_middleware};
#[cfg(feature = "observability")]
pub use self::metrics::{init_metrics, metrics_app, metrics_middleware, track_commit, track_intent};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    pub fn is_observability_enabled() -> bool {
        false
    }

    /// Console logging only.
    pub fn init_tracing() {
        super::init_basic_console_logging();
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_metrics() -> Option<()> {
        None
    }

    pub fn track_intent(_outcome: &'static str) {}
    pub fn track_commit(_status: &'static str, _elapsed: std::time::Duration) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
