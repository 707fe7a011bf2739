//! HTTP endpoints.
//!
//! - `/`               : landing page
//! - `/healthz`        : liveness
//! - telemetry path    : the scrape handler

use std::net::SocketAddr;
use std::time::UNIX_EPOCH;

use axum::{
    extract::{ConnectInfo, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn landing(State(state): State<AppState>) -> impl IntoResponse {
    let dispatcher = state.dispatcher();
    let started = dispatcher
        .producers()
        .process_start_time()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let body = format!(
        "{name} {version}\n\nmetrics:    {path}\ncollectors: {collectors}\nstarted:    {started} (unix seconds)\n",
        name = crate::EXPORTER_NAME,
        version = env!("CARGO_PKG_VERSION"),
        path = state.cfg().web.telemetry_path,
        collectors = dispatcher.producers().names().join(", "),
    );
    (StatusCode::OK, body)
}

pub async fn scrape(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state
        .dispatcher()
        .serve(connect.map(|ConnectInfo(addr)| addr), &headers, query.as_deref())
        .await
}
