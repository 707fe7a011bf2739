//! Shared application state for the exporter.
//!
//! Startup errors (bad producer set, self-metrics registration) are returned,
//! not panicked.

use std::sync::Arc;

use scrapeguard_core::error::Result;
use scrapeguard_core::ProducerSet;

use crate::config::ExporterConfig;
use crate::dispatch::MetricsDispatcher;
use crate::{producers, EXPORTER_NAME};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    dispatcher: Arc<MetricsDispatcher>,
}

struct AppStateInner {
    cfg: ExporterConfig,
}

impl AppState {
    /// Build state with the built-in producers named in `collectors.enabled`.
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        let set = producers::build_set(EXPORTER_NAME, &cfg.collectors.enabled)?;
        tracing::info!(collectors = ?set.names(), "enabled collectors");
        Self::with_producers(cfg, Arc::new(set))
    }

    /// Build state around an existing producer set.
    pub fn with_producers(cfg: ExporterConfig, producers: Arc<ProducerSet>) -> Result<Self> {
        let dispatcher = MetricsDispatcher::new(producers, cfg.handler)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn dispatcher(&self) -> Arc<MetricsDispatcher> {
        Arc::clone(&self.dispatcher)
    }
}
