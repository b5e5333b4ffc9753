use anyhow::Context;
use dotenvy::dotenv;
use shule::router::init_router;
use shule::state::{init_app_state, spawn_session_sweeper};
use shule_observability::{init_metrics, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state()?;
    let address = state.server_config.bind_address();
    spawn_session_sweeper(state.sessions.clone(), state.server_config.session_idle_ttl);

    #[cfg_attr(not(feature = "observability"), allow(unused_mut))]
    let mut app = init_router(state);

    #[cfg(feature = "observability")]
    if let Some(handle) = init_metrics() {
        app = app.merge(shule_observability::metrics_app(handle));
        info!("Prometheus metrics exposed at /metrics");
    }
    #[cfg(not(feature = "observability"))]
    let _ = init_metrics();

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
