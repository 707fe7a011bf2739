//! Exporter self-observation.
//!
//! A long-lived registry, separate from the per-scrape registries, holding
//! build info, process resource usage, tokio runtime gauges, and the scrape
//! handler's own request counters.

pub mod runtime;
pub mod self_metrics;

pub use self_metrics::{InFlightGuard, SelfMetrics};
