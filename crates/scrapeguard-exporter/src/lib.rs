//! scrapeguard exporter library entry.
//!
//! This crate wires config, the built-in producers, the scrape dispatcher,
//! and self metrics into an axum router. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod ops;
pub mod producers;
pub mod router;

/// Exporter name: metric namespace and build-info prefix for scraped metrics.
pub const EXPORTER_NAME: &str = "scrapeguard";
