//! Axum router wiring.
//!
//! The telemetry path accepts any method; `/` and `/healthz` are fixed.

use axum::{
    routing::{any, get},
    Router,
};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let telemetry_path = state.cfg().web.telemetry_path.clone();

    Router::new()
        .route("/", get(ops::landing))
        .route("/healthz", get(ops::healthz))
        .route(&telemetry_path, any(ops::scrape))
        .with_state(state)
}
