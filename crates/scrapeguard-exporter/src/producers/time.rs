//! Host wall clock.

use std::time::{SystemTime, UNIX_EPOCH};

use prometheus::core::Collector;
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};

use scrapeguard_core::error::{Result, ScrapeGuardError};
use scrapeguard_core::{Producer, ScrapeContext};

/// Wall clock of the host.
pub struct TimeProducer {
    namespace: String,
}

impl TimeProducer {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
        }
    }
}

impl Producer for TimeProducer {
    fn name(&self) -> &'static str {
        "time"
    }

    fn collect(&self, _ctx: &ScrapeContext) -> Result<Vec<MetricFamily>> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ScrapeGuardError::collect(self.name(), e))?;

        let gauge = Gauge::with_opts(
            Opts::new(
                "current_timestamp_seconds",
                "Current time in seconds since the Unix epoch.",
            )
            .namespace(self.namespace.as_str())
            .subsystem("time"),
        )
        .map_err(|e| ScrapeGuardError::collect(self.name(), e))?;
        gauge.set(now.as_secs_f64());

        Ok(gauge.collect())
    }
}
