//! scrapeguard core: the producer abstraction, collector-set resolution, and
//! the shared error surface.
//!
//! This crate knows nothing about HTTP or async runtimes. It defines how metric
//! producers are named, filtered per request, and folded into a single
//! Prometheus collector that honours a scrape deadline.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. A misbehaving
//! producer or a malformed request must surface as `ScrapeGuardError`, never
//! bring the exporter down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod composite;
pub mod error;
pub mod producer;
pub mod set;

/// Shared result type.
pub use error::{Result, ScrapeGuardError};
pub use composite::ScrapeCollector;
pub use producer::{Producer, ScrapeContext};
pub use set::{resolve_producers, ProducerSet};
