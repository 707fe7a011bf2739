//! Single-slot admission control for the exclusive data source.
//!
//! `try_acquire` never waits: either the caller gets the only permit or the
//! request is refused with `CapacityExhausted`. The permit is returned when
//! [`GatePermit`] is dropped, which also happens while unwinding from a
//! panicking collector.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use scrapeguard_core::error::{Result, ScrapeGuardError};

/// Number of scrapes allowed to touch the data source at once.
pub const GATE_CAPACITY: usize = 1;

#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    permits: Arc<Semaphore>,
}

/// Proof of exclusive access. Release happens on drop.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(GATE_CAPACITY)),
        }
    }

    pub fn try_acquire(&self) -> Result<GatePermit> {
        Arc::clone(&self.permits)
            .try_acquire_owned()
            .map(|permit| GatePermit { _permit: permit })
            .map_err(|_| ScrapeGuardError::CapacityExhausted)
    }

    /// Free slots right now (0 or 1).
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new()
    }
}
