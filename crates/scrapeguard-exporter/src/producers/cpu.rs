//! Load averages and logical CPU count.

use prometheus::core::Collector;
use prometheus::proto::MetricFamily;
#[cfg(target_os = "linux")]
use prometheus::GaugeVec;
use prometheus::{Gauge, Opts};

use scrapeguard_core::error::{Result, ScrapeGuardError};
use scrapeguard_core::{Producer, ScrapeContext};

pub struct CpuProducer {
    namespace: String,
}

impl CpuProducer {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
        }
    }

    fn opts(&self, name: &str, help: &str) -> Opts {
        Opts::new(name, help)
            .namespace(self.namespace.as_str())
            .subsystem("cpu")
    }

    fn count_family(&self) -> Result<Vec<MetricFamily>> {
        let count = std::thread::available_parallelism()
            .map_err(|e| ScrapeGuardError::collect(self.name(), e))?;
        let gauge = Gauge::with_opts(self.opts("count", "Number of logical CPUs available."))
            .map_err(|e| ScrapeGuardError::collect(self.name(), e))?;
        gauge.set(count.get() as f64);
        Ok(gauge.collect())
    }
}

impl Producer for CpuProducer {
    fn name(&self) -> &'static str {
        "cpu"
    }

    #[cfg(target_os = "linux")]
    fn collect(&self, _ctx: &ScrapeContext) -> Result<Vec<MetricFamily>> {
        let raw = std::fs::read_to_string("/proc/loadavg")
            .map_err(|e| ScrapeGuardError::collect(self.name(), e))?;
        let loads = parse_loadavg(&raw)
            .ok_or_else(|| ScrapeGuardError::collect(self.name(), "malformed /proc/loadavg"))?;

        let load = GaugeVec::new(
            self.opts("load_average", "System load average over the given window."),
            &["window"],
        )
        .map_err(|e| ScrapeGuardError::collect(self.name(), e))?;
        for (window, value) in ["1m", "5m", "15m"].into_iter().zip(loads) {
            load.with_label_values(&[window]).set(value);
        }

        let mut out = load.collect();
        out.extend(self.count_family()?);
        Ok(out)
    }

    #[cfg(not(target_os = "linux"))]
    fn collect(&self, _ctx: &ScrapeContext) -> Result<Vec<MetricFamily>> {
        self.count_family()
    }
}

/// First three fields of `/proc/loadavg`.
pub fn parse_loadavg(raw: &str) -> Option<[f64; 3]> {
    let mut it = raw.split_whitespace().map(|f| f.parse::<f64>());
    let one = it.next()?.ok()?;
    let five = it.next()?.ok()?;
    let fifteen = it.next()?.ok()?;
    Some([one, five, fifteen])
}
