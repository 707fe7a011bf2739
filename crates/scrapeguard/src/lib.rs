//! Top-level facade crate for scrapeguard.
//!
//! Re-exports the core types and the exporter library so users can depend on a single crate.

pub mod core {
    pub use scrapeguard_core::*;
}

pub mod exporter {
    pub use scrapeguard_exporter::*;
}
