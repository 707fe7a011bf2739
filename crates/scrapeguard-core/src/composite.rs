//! Composite collector: one Prometheus collector wrapping a producer set.
//!
//! Producers run sequentially in name order against a shared deadline that
//! starts when the registry is gathered. Alongside the producers' own
//! families it reports per-producer duration, success, and timeout gauges.
//! A failing producer is logged and reported, it never fails the scrape.
//! Results that arrive after the deadline are dropped.

use std::sync::Arc;
use std::time::{Duration, Instant};

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts};
use tracing::{debug, warn, Span};

use crate::producer::ScrapeContext;
use crate::set::ProducerSet;

/// Longest deadline used when the requested timeout overflows the clock.
pub const MAX_DEADLINE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub struct ScrapeCollector {
    producers: Arc<ProducerSet>,
    timeout: Duration,
    span: Span,
    duration: GaugeVec,
    success: GaugeVec,
    timed_out: GaugeVec,
}

impl ScrapeCollector {
    pub fn new(
        producers: Arc<ProducerSet>,
        namespace: &str,
        timeout: Duration,
        span: Span,
    ) -> prometheus::Result<Self> {
        let duration = GaugeVec::new(
            Opts::new("collector_duration_seconds", "Duration of a collection.")
                .namespace(namespace),
            &["collector"],
        )?;
        let success = GaugeVec::new(
            Opts::new("collector_success", "Whether the collector was successful.")
                .namespace(namespace),
            &["collector"],
        )?;
        let timed_out = GaugeVec::new(
            Opts::new("collector_timeout", "Whether the collector timed out.")
                .namespace(namespace),
            &["collector"],
        )?;

        Ok(Self {
            producers,
            timeout,
            span,
            duration,
            success,
            timed_out,
        })
    }

    fn record(&self, name: &str, elapsed: Duration, ok: bool, timed_out: bool) {
        self.duration
            .with_label_values(&[name])
            .set(elapsed.as_secs_f64());
        self.success
            .with_label_values(&[name])
            .set(if ok { 1.0 } else { 0.0 });
        self.timed_out
            .with_label_values(&[name])
            .set(if timed_out { 1.0 } else { 0.0 });
    }
}

/// `now + timeout`, capped at [`MAX_DEADLINE`] when the sum does not fit an `Instant`.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .or_else(|| now.checked_add(MAX_DEADLINE))
        .unwrap_or(now)
}

impl Collector for ScrapeCollector {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs = self.duration.desc();
        descs.extend(self.success.desc());
        descs.extend(self.timed_out.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let _guard = self.span.enter();
        let ctx = ScrapeContext::new(deadline_after(self.timeout), self.span.clone());
        let mut families = Vec::new();

        for (name, producer) in self.producers.iter() {
            if ctx.expired() {
                warn!(collector = name, "scrape deadline exceeded before collector ran");
                self.record(name, Duration::ZERO, false, true);
                continue;
            }

            let started = Instant::now();
            let result = producer.collect(&ctx);
            let elapsed = started.elapsed();

            if ctx.expired() {
                warn!(collector = name, ?elapsed, "collector exceeded scrape deadline, results dropped");
                self.record(name, elapsed, false, true);
                continue;
            }

            match result {
                Ok(mfs) => {
                    debug!(collector = name, ?elapsed, families = mfs.len(), "collector succeeded");
                    families.extend(mfs);
                    self.record(name, elapsed, true, false);
                }
                Err(e) => {
                    warn!(collector = name, ?elapsed, error = %e, "collector failed");
                    self.record(name, elapsed, false, false);
                }
            }
        }

        families.extend(self.duration.collect());
        families.extend(self.success.collect());
        families.extend(self.timed_out.collect());
        families
    }
}
