//! Tokio runtime gauges for the self-metrics registry.

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{IntGauge, Opts};
use tokio::runtime::Handle;

/// Tokio runtime internals, sampled at gather time.
///
/// Outside a runtime the gauges keep their last value.
pub struct RuntimeCollector {
    workers: IntGauge,
    alive_tasks: IntGauge,
}

impl RuntimeCollector {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            workers: IntGauge::with_opts(Opts::new(
                "tokio_runtime_workers",
                "Number of worker threads used by the runtime.",
            ))?,
            alive_tasks: IntGauge::with_opts(Opts::new(
                "tokio_runtime_alive_tasks",
                "Number of alive tasks in the runtime.",
            ))?,
        })
    }
}

impl Collector for RuntimeCollector {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs = self.workers.desc();
        descs.extend(self.alive_tasks.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        if let Ok(handle) = Handle::try_current() {
            let metrics = handle.metrics();
            self.workers.set(metrics.num_workers() as i64);
            self.alive_tasks.set(metrics.num_alive_tasks() as i64);
        }

        let mut families = self.workers.collect();
        families.extend(self.alive_tasks.collect());
        families
    }
}
