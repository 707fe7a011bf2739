//! Shared error type across scrapeguard crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid request or configuration.
    BadRequest,
    /// The exclusive data source is busy.
    Unavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ScrapeGuardError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum ScrapeGuardError {
    #[error("unknown collector(s): {}", .0.join(", "))]
    UnknownCollectors(Vec<String>),
    #[error("duplicate collector: {0}")]
    DuplicateCollector(String),
    #[error("couldn't clone metric collectors: {0}")]
    SubsetFailed(#[source] Box<ScrapeGuardError>),
    #[error("couldn't register Prometheus collector: {0}")]
    Registration(#[source] prometheus::Error),
    #[error("couldn't register exporter metrics: {0}")]
    StartupRegistration(#[source] prometheus::Error),
    #[error("too many concurrent requests")]
    CapacityExhausted,
    #[error("collector {collector} failed: {reason}")]
    Collect { collector: String, reason: String },
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ScrapeGuardError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ScrapeGuardError::UnknownCollectors(_)
            | ScrapeGuardError::DuplicateCollector(_)
            | ScrapeGuardError::SubsetFailed(_)
            | ScrapeGuardError::Registration(_)
            | ScrapeGuardError::Config(_) => ClientCode::BadRequest,
            ScrapeGuardError::CapacityExhausted => ClientCode::Unavailable,
            ScrapeGuardError::StartupRegistration(_)
            | ScrapeGuardError::Collect { .. }
            | ScrapeGuardError::Unsupported(_)
            | ScrapeGuardError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Shorthand for producer-side failures.
    pub fn collect(collector: &str, reason: impl std::fmt::Display) -> Self {
        ScrapeGuardError::Collect {
            collector: collector.to_string(),
            reason: reason.to_string(),
        }
    }
}
