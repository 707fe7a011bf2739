//! Request-scoped registries and the gatherer that merges them.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use prometheus::proto::MetricFamily;
use prometheus::{IntGaugeVec, Opts, Registry};
use tracing::{warn, Span};

use scrapeguard_core::error::{Result, ScrapeGuardError};
use scrapeguard_core::ProducerSet;

/// `<exporter>_build_info{version,os,arch} 1`.
pub fn build_info_collector(exporter: &str) -> prometheus::Result<IntGaugeVec> {
    let gauge = IntGaugeVec::new(
        Opts::new(
            format!("{exporter}_build_info"),
            format!("A metric with a constant '1' value labeled by version, os, and arch from which {exporter} was built."),
        ),
        &["version", "os", "arch"],
    )?;
    gauge
        .with_label_values(&[
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH,
        ])
        .set(1);
    Ok(gauge)
}

/// Fresh registry holding build info plus one composite over `producers`.
///
/// Both registrations go into a new registry, so a collision means the
/// producer set itself is inconsistent.
pub fn build_registry(
    exporter: &str,
    producers: &Arc<ProducerSet>,
    timeout: Duration,
    span: Span,
) -> Result<Registry> {
    let reg = Registry::new();

    let build_info = build_info_collector(exporter).map_err(ScrapeGuardError::Registration)?;
    reg.register(Box::new(build_info))
        .map_err(ScrapeGuardError::Registration)?;

    let composite = producers
        .to_composite(exporter, timeout, span)
        .map_err(ScrapeGuardError::Registration)?;
    reg.register(Box::new(composite))
        .map_err(ScrapeGuardError::Registration)?;

    Ok(reg)
}

/// Ordered list of registries gathered into one exposition.
#[derive(Clone, Default)]
pub struct Gatherers {
    registries: Vec<Registry>,
}

impl Gatherers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, registry: Registry) {
        self.registries.push(registry);
    }

    /// Gather every registry and merge by family name, sorted.
    pub fn gather(&self) -> Vec<MetricFamily> {
        let mut merged: BTreeMap<String, MetricFamily> = BTreeMap::new();

        for reg in &self.registries {
            for mut mf in reg.gather() {
                match merged.get_mut(mf.get_name()) {
                    Some(existing) if existing.get_field_type() == mf.get_field_type() => {
                        warn!(family = mf.get_name(), "metric family exposed by more than one registry");
                        for m in mf.take_metric().into_iter() {
                            existing.mut_metric().push(m);
                        }
                    }
                    Some(_) => {
                        warn!(family = mf.get_name(), "conflicting metric family type, dropped");
                    }
                    None => {
                        merged.insert(mf.get_name().to_string(), mf);
                    }
                }
            }
        }

        merged.into_values().collect()
    }
}
