//! scrapeguard exporter binary.
//!
//! Usage: `scrapeguard-exporter [config.yaml]` (default `scrapeguard.yaml`).
//! Log level comes from `RUST_LOG`.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use scrapeguard_core::error::{Result, ScrapeGuardError};
use scrapeguard_exporter::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.web.listen_addr()?;
    let telemetry_path = cfg.web.telemetry_path.clone();

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, %telemetry_path, "scrapeguard-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ScrapeGuardError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ScrapeGuardError::Internal(format!("server failed: {e}")))?;

    tracing::info!("scrapeguard-exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
