//! Producer trait: one named source of metric families.
//!
//! Producers read the underlying system state. They are invoked with a
//! [`ScrapeContext`] carrying the absolute deadline of the current scrape and
//! the request span, so anything they log is correlated with the request.

use std::time::{Duration, Instant};

use prometheus::proto::MetricFamily;
use tracing::Span;

use crate::error::Result;

/// A named metric producer.
///
/// Implementations must be safe to share across requests: `collect` takes
/// `&self` and is never given mutable access.
pub trait Producer: Send + Sync {
    /// Stable name used by `collect[]` filtering.
    fn name(&self) -> &'static str;

    /// Produce the current batch of metric families.
    fn collect(&self, ctx: &ScrapeContext) -> Result<Vec<MetricFamily>>;
}

/// Per-invocation context handed to producers.
#[derive(Debug, Clone)]
pub struct ScrapeContext {
    pub deadline: Instant,
    pub span: Span,
}

impl ScrapeContext {
    pub fn new(deadline: Instant, span: Span) -> Self {
        Self { deadline, span }
    }

    /// Budget left before the deadline (zero once it has passed).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
