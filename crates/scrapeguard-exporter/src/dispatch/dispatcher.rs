//! Scrape request dispatcher.
//!
//! One call to [`MetricsDispatcher::serve`] walks a scrape through:
//! received -> timeout resolved -> producer set resolved -> registry built ->
//! gate acquired -> served. Everything before the gate runs concurrently
//! across requests; only gathering is serialized. Failures before the gate
//! answer 400, a busy gate answers 503.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::{debug, error, info_span, warn, Span};
use uuid::Uuid;

use scrapeguard_core::error::{ClientCode, Result};
use scrapeguard_core::{resolve_producers, ProducerSet};

use crate::config::HandlerConfig;
use crate::obs::SelfMetrics;
use crate::EXPORTER_NAME;

use super::gate::ConcurrencyGate;
use super::registry::{build_registry, Gatherers};
use super::timeout;

/// Query parameter naming producers to run (repeatable).
pub const COLLECT_PARAM: &str = "collect[]";

pub struct MetricsDispatcher {
    producers: Arc<ProducerSet>,
    self_metrics: Option<Arc<SelfMetrics>>,
    cfg: HandlerConfig,
    gate: ConcurrencyGate,
}

impl MetricsDispatcher {
    /// Build the dispatcher. Self metrics are registered here, once.
    pub fn new(producers: Arc<ProducerSet>, cfg: HandlerConfig) -> Result<Self> {
        let self_metrics = if cfg.disable_exporter_metrics {
            None
        } else {
            Some(Arc::new(SelfMetrics::new(producers.process_start_time())?))
        };

        Ok(Self {
            producers,
            self_metrics,
            cfg,
            gate: ConcurrencyGate::new(),
        })
    }

    pub fn producers(&self) -> &Arc<ProducerSet> {
        &self.producers
    }

    /// Serve one scrape.
    pub async fn serve(
        &self,
        remote: Option<SocketAddr>,
        headers: &HeaderMap,
        query: Option<&str>,
    ) -> Response {
        let correlation_id = Uuid::new_v4();
        let remote = remote.map(|r| r.to_string()).unwrap_or_default();
        let span = info_span!("scrape", %correlation_id, %remote);

        let scrape_timeout = span.in_scope(|| timeout::from_headers(headers, self.cfg.timeout_margin));
        let requested = requested_collectors(query);

        let registry = match self.prepare(&requested, scrape_timeout, span.clone()) {
            Ok(reg) => reg,
            Err(e) => {
                warn!(parent: &span, error = %e, code = e.client_code().as_str(), "Couldn't create filtered metrics handler");
                return (
                    status_for(e.client_code()),
                    format!("Couldn't create filtered metrics handler: {e}"),
                )
                    .into_response();
            }
        };

        let permit = match self.gate.try_acquire() {
            Ok(p) => p,
            Err(e) => {
                warn!(parent: &span, error = %e, code = e.client_code().as_str(), "scrape rejected, data source busy");
                return (status_for(e.client_code()), "Too many concurrent requests")
                    .into_response();
            }
        };

        let mut gatherers = Gatherers::new();
        if let Some(m) = &self.self_metrics {
            gatherers.push(m.registry().clone());
        }
        gatherers.push(registry);

        let self_metrics = self.self_metrics.clone();
        let started = Instant::now();
        let job_span = span.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let _in_flight = self_metrics.as_ref().map(|m| m.track_in_flight());
            let _enter = job_span.enter();

            let families = gatherers.gather();
            let encoder = TextEncoder::new();
            let mut body = Vec::new();
            match encoder.encode(&families, &mut body) {
                Ok(()) => Ok((encoder.format_type().to_string(), body)),
                Err(e) => {
                    if let Some(m) = &self_metrics {
                        m.encoding_error();
                    }
                    Err(e.to_string())
                }
            }
        })
        .await;

        let response = match joined {
            Ok(Ok((content_type, body))) => {
                debug!(parent: &span, elapsed = ?started.elapsed(), bytes = body.len(), "scrape served");
                (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            Ok(Err(e)) => {
                error!(parent: &span, error = %e, "error encoding metrics");
                serve_error()
            }
            Err(e) => {
                error!(parent: &span, error = %e, "scrape task aborted");
                serve_error()
            }
        };

        if let Some(m) = &self.self_metrics {
            m.observe_response(response.status().as_u16());
        }
        response
    }

    /// Resolve the producer subset and build the request registry.
    fn prepare(
        &self,
        requested: &[String],
        scrape_timeout: std::time::Duration,
        span: Span,
    ) -> Result<Registry> {
        let producers = resolve_producers(&self.producers, requested)?;
        debug!(
            parent: &span,
            collectors = ?producers.names(),
            timeout = ?scrape_timeout,
            "building scrape registry"
        );
        build_registry(EXPORTER_NAME, &producers, scrape_timeout, span)
    }
}

/// HTTP status for a client-facing error code.
pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn serve_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An error has occurred while serving metrics",
    )
        .into_response()
}

/// Every non-empty `collect[]` value in the raw query string.
pub fn requested_collectors(query: Option<&str>) -> Vec<String> {
    let Some(query) = query else {
        return Vec::new();
    };
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(k, v)| k == COLLECT_PARAM && !v.is_empty())
        .map(|(_, v)| v.into_owned())
        .collect()
}
