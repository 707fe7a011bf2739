//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;

use scrapeguard_core::error::{Result, ScrapeGuardError};

pub use schema::{CollectorsSection, ExporterConfig, HandlerConfig, WebSection};

/// Path used when no config path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "scrapeguard.yaml";

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ScrapeGuardError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| ScrapeGuardError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
