//! Physical memory and swap, from `/proc/meminfo`.

use std::collections::HashMap;

use prometheus::core::Collector;
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};

use scrapeguard_core::error::{Result, ScrapeGuardError};
use scrapeguard_core::{Producer, ScrapeContext};

/// `/proc/meminfo` key -> metric name (bytes).
const FIELDS: [(&str, &str, &str); 5] = [
    ("MemTotal", "total_bytes", "Total usable physical memory."),
    ("MemAvailable", "available_bytes", "Memory available for new workloads without swapping."),
    ("MemFree", "free_bytes", "Physical memory not in use."),
    ("SwapTotal", "swap_total_bytes", "Total swap space."),
    ("SwapFree", "swap_free_bytes", "Unused swap space."),
];

pub struct MemoryProducer {
    namespace: String,
}

impl MemoryProducer {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
        }
    }

    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    fn families(&self, meminfo: &HashMap<String, u64>) -> Result<Vec<MetricFamily>> {
        let mut out = Vec::new();
        for (key, metric, help) in FIELDS {
            let Some(value) = meminfo.get(key) else {
                continue;
            };
            let gauge = Gauge::with_opts(
                Opts::new(metric, help)
                    .namespace(self.namespace.as_str())
                    .subsystem("memory"),
            )
            .map_err(|e| ScrapeGuardError::collect(self.name(), e))?;
            gauge.set(*value as f64);
            out.extend(gauge.collect());
        }
        Ok(out)
    }
}

impl Producer for MemoryProducer {
    fn name(&self) -> &'static str {
        "memory"
    }

    #[cfg(target_os = "linux")]
    fn collect(&self, _ctx: &ScrapeContext) -> Result<Vec<MetricFamily>> {
        let raw = std::fs::read_to_string("/proc/meminfo")
            .map_err(|e| ScrapeGuardError::collect(self.name(), e))?;
        self.families(&parse_meminfo(&raw))
    }

    #[cfg(not(target_os = "linux"))]
    fn collect(&self, _ctx: &ScrapeContext) -> Result<Vec<MetricFamily>> {
        Err(ScrapeGuardError::Unsupported(
            "memory collector needs /proc/meminfo".into(),
        ))
    }
}

/// Parse `/proc/meminfo` into bytes. Lines that don't parse are skipped.
pub fn parse_meminfo(raw: &str) -> HashMap<String, u64> {
    raw.lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let mut parts = rest.split_whitespace();
            let value: u64 = parts.next()?.parse().ok()?;
            let scale = match parts.next() {
                Some("kB") => 1024,
                None => 1,
                Some(_) => return None,
            };
            Some((key.trim().to_string(), value.saturating_mul(scale)))
        })
        .collect()
}
