use std::net::SocketAddr;

use serde::Deserialize;
use scrapeguard_core::error::{Result, ScrapeGuardError};

use crate::dispatch::timeout::DEFAULT_SCRAPE_TIMEOUT_SECS;
use crate::producers;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub web: WebSection,

    #[serde(default)]
    pub handler: HandlerConfig,

    #[serde(default)]
    pub collectors: CollectorsSection,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ScrapeGuardError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.web.validate()?;
        self.handler.validate()?;
        self.collectors.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
}

impl Default for WebSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            telemetry_path: default_telemetry_path(),
        }
    }
}

impl WebSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.telemetry_path.starts_with('/') {
            return Err(ScrapeGuardError::Config(
                "web.telemetry_path must start with '/'".into(),
            ));
        }
        if matches!(self.telemetry_path.as_str(), "/" | "/healthz") {
            return Err(ScrapeGuardError::Config(format!(
                "web.telemetry_path must not shadow a built-in route: {}",
                self.telemetry_path
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ScrapeGuardError::Config(format!("web.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:9182".into()
}
fn default_telemetry_path() -> String {
    "/metrics".into()
}

/// Scrape handler options. Immutable once the handler is built.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Skip the exporter's own process/runtime/handler metrics.
    #[serde(default)]
    pub disable_exporter_metrics: bool,

    /// Seconds subtracted from the scraper's timeout.
    #[serde(default = "default_timeout_margin")]
    pub timeout_margin: f64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            disable_exporter_metrics: false,
            timeout_margin: default_timeout_margin(),
        }
    }
}

impl HandlerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.timeout_margin.is_finite()
            || !(0.0..DEFAULT_SCRAPE_TIMEOUT_SECS).contains(&self.timeout_margin)
        {
            return Err(ScrapeGuardError::Config(format!(
                "handler.timeout_margin must be in [0, {DEFAULT_SCRAPE_TIMEOUT_SECS})"
            )));
        }
        Ok(())
    }
}

fn default_timeout_margin() -> f64 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorsSection {
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,
}

impl Default for CollectorsSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

impl CollectorsSection {
    pub fn validate(&self) -> Result<()> {
        if self.enabled.is_empty() {
            return Err(ScrapeGuardError::Config(
                "collectors.enabled must not be empty".into(),
            ));
        }
        for (i, name) in self.enabled.iter().enumerate() {
            if !producers::AVAILABLE.contains(&name.as_str()) {
                return Err(ScrapeGuardError::Config(format!(
                    "collectors.enabled names an unknown collector: {name} (available: {})",
                    producers::AVAILABLE.join(", ")
                )));
            }
            if self.enabled[..i].contains(name) {
                return Err(ScrapeGuardError::Config(format!(
                    "collectors.enabled lists {name} twice"
                )));
            }
        }
        Ok(())
    }
}

fn default_enabled() -> Vec<String> {
    producers::AVAILABLE.iter().map(|s| s.to_string()).collect()
}
