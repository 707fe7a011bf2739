//! Per-request scrape pipeline.
//!
//! timeout resolution -> collector-set resolution -> registry build ->
//! gate admission -> gather/encode. Re-exports the pieces so downstream
//! consumers can depend on this module directly.

pub mod dispatcher;
pub mod gate;
pub mod registry;
pub mod timeout;

pub use dispatcher::{requested_collectors, status_for, MetricsDispatcher};
pub use gate::{ConcurrencyGate, GatePermit};
pub use registry::{build_registry, Gatherers};
