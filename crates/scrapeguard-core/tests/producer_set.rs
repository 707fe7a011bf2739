#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use prometheus::core::Collector;
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Registry};
use tracing::Span;

use scrapeguard_core::{
    resolve_producers, Producer, ProducerSet, Result, ScrapeContext, ScrapeGuardError,
};

struct StaticProducer {
    name: &'static str,
}

impl Producer for StaticProducer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn collect(&self, _ctx: &ScrapeContext) -> Result<Vec<MetricFamily>> {
        let g = Gauge::new(format!("test_{}_value", self.name), "static value").unwrap();
        g.set(1.0);
        Ok(g.collect())
    }
}

struct FailingProducer;

impl Producer for FailingProducer {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn collect(&self, _ctx: &ScrapeContext) -> Result<Vec<MetricFamily>> {
        Err(ScrapeGuardError::collect("broken", "device not ready"))
    }
}

struct SlowProducer;

impl Producer for SlowProducer {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn collect(&self, _ctx: &ScrapeContext) -> Result<Vec<MetricFamily>> {
        std::thread::sleep(Duration::from_millis(50));
        let g = Gauge::new("test_slow_value", "late value").unwrap();
        Ok(g.collect())
    }
}

fn base_set() -> Arc<ProducerSet> {
    let mut set = ProducerSet::new();
    for name in ["cpu", "memory", "time"] {
        set.register(Arc::new(StaticProducer { name })).unwrap();
    }
    Arc::new(set)
}

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn gather_names(collector: scrapeguard_core::ScrapeCollector) -> Vec<String> {
    let reg = Registry::new();
    reg.register(Box::new(collector)).unwrap();
    reg.gather().iter().map(|mf| mf.get_name().to_string()).collect()
}

fn gauge_value(families: &[MetricFamily], name: &str, collector: &str) -> f64 {
    let mf = families
        .iter()
        .find(|mf| mf.get_name() == name)
        .unwrap_or_else(|| panic!("missing family {name}"));
    mf.get_metric()
        .iter()
        .find(|m| m.get_label().iter().any(|l| l.get_value() == collector))
        .unwrap_or_else(|| panic!("missing {collector} in {name}"))
        .get_gauge()
        .get_value()
}

#[test]
fn empty_request_reuses_base_set() {
    let base = base_set();
    let resolved = resolve_producers(&base, &[]).unwrap();
    assert!(Arc::ptr_eq(&base, &resolved));
}

#[test]
fn subset_keeps_only_requested_names() {
    let base = base_set();
    let resolved = resolve_producers(&base, &names(&["memory", "cpu", "memory"])).unwrap();

    assert!(!Arc::ptr_eq(&base, &resolved));
    assert_eq!(resolved.names(), vec!["cpu", "memory"]);
    assert_eq!(base.len(), 3);
    assert_eq!(resolved.process_start_time(), base.process_start_time());
}

#[test]
fn unknown_names_are_reported_with_cause_chain() {
    let base = base_set();
    let err = resolve_producers(&base, &names(&["cpu", "gpu", "disk", "gpu"])).unwrap_err();

    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    let msg = err.to_string();
    assert!(msg.starts_with("couldn't clone metric collectors"), "{msg}");
    assert!(msg.contains("gpu, disk"), "{msg}");

    let source = std::error::Error::source(&err).expect("wrapped cause");
    assert_eq!(source.to_string(), "unknown collector(s): gpu, disk");
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut set = ProducerSet::new();
    set.register(Arc::new(StaticProducer { name: "cpu" })).unwrap();
    let err = set
        .register(Arc::new(StaticProducer { name: "cpu" }))
        .unwrap_err();
    assert!(matches!(err, ScrapeGuardError::DuplicateCollector(ref n) if n == "cpu"));
}

#[test]
fn composite_exposes_producers_and_collector_gauges() {
    let subset = resolve_producers(&base_set(), &names(&["time"])).unwrap();
    let collector = subset
        .to_composite("test", Duration::from_secs(5), Span::none())
        .unwrap();

    let got = gather_names(collector);
    assert!(got.contains(&"test_time_value".to_string()));
    assert!(!got.contains(&"test_cpu_value".to_string()));
    assert!(got.contains(&"test_collector_duration_seconds".to_string()));
    assert!(got.contains(&"test_collector_success".to_string()));
    assert!(got.contains(&"test_collector_timeout".to_string()));
}

#[test]
fn failing_producer_does_not_fail_the_scrape() {
    let mut set = ProducerSet::new();
    set.register(Arc::new(StaticProducer { name: "cpu" })).unwrap();
    set.register(Arc::new(FailingProducer)).unwrap();
    let set = Arc::new(set);

    let collector = set
        .to_composite("test", Duration::from_secs(5), Span::none())
        .unwrap();
    let families = collector.collect();

    assert!(families.iter().any(|mf| mf.get_name() == "test_cpu_value"));
    assert_eq!(gauge_value(&families, "test_collector_success", "cpu"), 1.0);
    assert_eq!(gauge_value(&families, "test_collector_success", "broken"), 0.0);
    assert_eq!(gauge_value(&families, "test_collector_timeout", "broken"), 0.0);
}

#[test]
fn late_results_are_dropped_and_flagged() {
    let mut set = ProducerSet::new();
    set.register(Arc::new(SlowProducer)).unwrap();
    set.register(Arc::new(StaticProducer { name: "time" })).unwrap();
    let set = Arc::new(set);

    // "slow" sorts before "time", so it burns the whole budget.
    let collector = set
        .to_composite("test", Duration::from_millis(10), Span::none())
        .unwrap();
    let families = collector.collect();

    assert!(!families.iter().any(|mf| mf.get_name() == "test_slow_value"));
    assert!(!families.iter().any(|mf| mf.get_name() == "test_time_value"));
    assert_eq!(gauge_value(&families, "test_collector_timeout", "slow"), 1.0);
    assert_eq!(gauge_value(&families, "test_collector_timeout", "time"), 1.0);
    assert_eq!(gauge_value(&families, "test_collector_success", "time"), 0.0);
}

#[test]
fn same_composite_twice_in_one_registry_collides() {
    let set = base_set();
    let reg = Registry::new();
    reg.register(Box::new(
        set.to_composite("test", Duration::from_secs(1), Span::none())
            .unwrap(),
    ))
    .unwrap();

    let err = reg
        .register(Box::new(
            set.to_composite("test", Duration::from_secs(1), Span::none())
                .unwrap(),
        ))
        .unwrap_err();
    assert!(matches!(err, prometheus::Error::AlreadyReg));
}

#[test]
fn oversized_timeout_is_capped_instead_of_overflowing() {
    let set = base_set();
    let collector = set
        .to_composite("test", Duration::MAX, Span::none())
        .unwrap();
    let families = collector.collect();

    assert!(families.iter().any(|mf| mf.get_name() == "test_cpu_value"));
    assert_eq!(gauge_value(&families, "test_collector_success", "time"), 1.0);
    assert_eq!(gauge_value(&families, "test_collector_timeout", "time"), 0.0);
}
