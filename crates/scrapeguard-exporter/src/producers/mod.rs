//! Built-in producers.
//!
//! Each one reads a single slice of host state. They are cheap and blocking;
//! the dispatcher runs them on a blocking thread behind the concurrency gate.

pub mod cpu;
pub mod memory;
pub mod time;

use std::sync::Arc;

use scrapeguard_core::error::{Result, ScrapeGuardError};
use scrapeguard_core::{Producer, ProducerSet};

pub use cpu::CpuProducer;
pub use memory::MemoryProducer;
pub use time::TimeProducer;

/// Names accepted in `collectors.enabled`.
pub const AVAILABLE: [&str; 3] = ["cpu", "memory", "time"];

/// Build the base set from configured names.
pub fn build_set(namespace: &str, enabled: &[String]) -> Result<ProducerSet> {
    let mut set = ProducerSet::new();
    for name in enabled {
        set.register(build_one(namespace, name)?)?;
    }
    Ok(set)
}

fn build_one(namespace: &str, name: &str) -> Result<Arc<dyn Producer>> {
    let producer: Arc<dyn Producer> = match name {
        "cpu" => Arc::new(CpuProducer::new(namespace)),
        "memory" => Arc::new(MemoryProducer::new(namespace)),
        "time" => Arc::new(TimeProducer::new(namespace)),
        other => return Err(ScrapeGuardError::UnknownCollectors(vec![other.to_string()])),
    };
    Ok(producer)
}
