//! Process-lifetime registry for the exporter's own health.
//!
//! Names here never start with the exporter namespace, so they cannot collide
//! with anything a scrape registry produces.

use std::time::SystemTime;

use prometheus::{IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry};

use scrapeguard_core::error::{Result, ScrapeGuardError};

use super::runtime::RuntimeCollector;

pub struct SelfMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    in_flight: IntGauge,
    errors_total: IntCounterVec,
}

impl SelfMetrics {
    /// Build and populate the registry. Failure here is a startup error.
    pub fn new(start_time: SystemTime) -> Result<Self> {
        Self::build(start_time).map_err(ScrapeGuardError::StartupRegistration)
    }

    fn build(start_time: SystemTime) -> prometheus::Result<Self> {
        let registry = Registry::new();

        let build_info = IntGaugeVec::new(
            Opts::new(
                "rust_build_info",
                "Build information about the running exporter binary.",
            ),
            &["package", "version", "profile"],
        )?;
        let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
        build_info
            .with_label_values(&[env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), profile])
            .set(1);
        registry.register(Box::new(build_info))?;

        register_process_collector(&registry, start_time)?;
        registry.register(Box::new(RuntimeCollector::new()?))?;

        let requests_total = IntCounterVec::new(
            Opts::new(
                "http_metric_handler_requests_total",
                "Total number of scrapes by HTTP status code.",
            ),
            &["code"],
        )?;
        let in_flight = IntGauge::with_opts(Opts::new(
            "http_metric_handler_requests_in_flight",
            "Current number of scrapes being served.",
        ))?;
        let errors_total = IntCounterVec::new(
            Opts::new(
                "http_metric_handler_errors_total",
                "Total number of internal errors encountered by the metric handler.",
            ),
            &["cause"],
        )?;

        // Pre-initialise so the series exist before the first scrape finishes.
        for code in ["200", "500"] {
            requests_total.with_label_values(&[code]);
        }
        errors_total.with_label_values(&["encoding"]);

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(in_flight.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            in_flight,
            errors_total,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Count one scrape as in flight until the guard drops.
    pub fn track_in_flight(&self) -> InFlightGuard {
        self.in_flight.inc();
        InFlightGuard {
            gauge: self.in_flight.clone(),
        }
    }

    pub fn observe_response(&self, code: u16) {
        self.requests_total
            .with_label_values(&[&code.to_string()])
            .inc();
    }

    pub fn encoding_error(&self) {
        self.errors_total.with_label_values(&["encoding"]).inc();
    }
}

pub struct InFlightGuard {
    gauge: IntGauge,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

#[cfg(target_os = "linux")]
fn register_process_collector(registry: &Registry, _start_time: SystemTime) -> prometheus::Result<()> {
    registry.register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))
}

#[cfg(not(target_os = "linux"))]
fn register_process_collector(registry: &Registry, start_time: SystemTime) -> prometheus::Result<()> {
    let gauge = prometheus::Gauge::with_opts(Opts::new(
        "process_start_time_seconds",
        "Start time of the process since unix epoch in seconds.",
    ))?;
    let secs = start_time
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();
    gauge.set(secs);
    registry.register(Box::new(gauge))
}
