//! Named producer sets and per-request subset resolution.
//!
//! The base set is built once at startup and shared behind an `Arc`. A scrape
//! that names producers through `collect[]` gets its own subset; a scrape that
//! names none reuses the base set as-is.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::Span;

use crate::composite::ScrapeCollector;
use crate::error::{Result, ScrapeGuardError};
use crate::producer::Producer;

/// Name-ordered collection of producers.
#[derive(Clone)]
pub struct ProducerSet {
    producers: BTreeMap<&'static str, Arc<dyn Producer>>,
    start_time: SystemTime,
}

impl ProducerSet {
    pub fn new() -> Self {
        Self::with_start_time(SystemTime::now())
    }

    pub fn with_start_time(start_time: SystemTime) -> Self {
        Self {
            producers: BTreeMap::new(),
            start_time,
        }
    }

    /// Add a producer. Names must be unique within a set.
    pub fn register(&mut self, producer: Arc<dyn Producer>) -> Result<()> {
        let name = producer.name();
        if self.producers.contains_key(name) {
            return Err(ScrapeGuardError::DuplicateCollector(name.to_string()));
        }
        self.producers.insert(name, producer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.producers.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Arc<dyn Producer>)> {
        self.producers.iter().map(|(name, p)| (*name, p))
    }

    /// When the exporter (and therefore this set) came up.
    pub fn process_start_time(&self) -> SystemTime {
        self.start_time
    }

    /// Build an independent set holding only the named producers.
    ///
    /// Duplicates in `names` are tolerated. Every unknown name is reported in
    /// a single `UnknownCollectors` error.
    pub fn clone_with_subset(&self, names: &[String]) -> Result<ProducerSet> {
        let mut unknown: Vec<String> = Vec::new();
        let mut producers = BTreeMap::new();

        for name in names {
            match self.producers.get_key_value(name.as_str()) {
                Some((key, producer)) => {
                    producers.insert(*key, Arc::clone(producer));
                }
                None => {
                    if !unknown.contains(name) {
                        unknown.push(name.clone());
                    }
                }
            }
        }

        if !unknown.is_empty() {
            return Err(ScrapeGuardError::UnknownCollectors(unknown));
        }

        Ok(ProducerSet {
            producers,
            start_time: self.start_time,
        })
    }

    /// Wrap this set into a single Prometheus collector bounded by `timeout`.
    pub fn to_composite(
        self: &Arc<Self>,
        namespace: &str,
        timeout: Duration,
        span: Span,
    ) -> prometheus::Result<ScrapeCollector> {
        ScrapeCollector::new(Arc::clone(self), namespace, timeout, span)
    }
}

impl Default for ProducerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProducerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerSet")
            .field("producers", &self.names())
            .field("start_time", &self.start_time)
            .finish()
    }
}

/// Pick the producers a scrape should run.
///
/// An empty request returns `base` itself (same allocation). Otherwise a fresh
/// subset is built; failures are wrapped so the cause chain survives.
pub fn resolve_producers(base: &Arc<ProducerSet>, requested: &[String]) -> Result<Arc<ProducerSet>> {
    if requested.is_empty() {
        return Ok(Arc::clone(base));
    }

    base.clone_with_subset(requested)
        .map(Arc::new)
        .map_err(|e| ScrapeGuardError::SubsetFailed(Box::new(e)))
}
