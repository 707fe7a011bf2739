//! Scrape deadline negotiation.
//!
//! Prometheus announces its own scrape timeout in
//! `X-Prometheus-Scrape-Timeout-Seconds`. The exporter answers a margin
//! earlier so the response still makes it back in time.
//!
//! Rules:
//! - absent or empty header: 10s default
//! - unparseable, non-finite, zero or negative: warn, 10s default
//! - otherwise the value is used with its fractional part intact
//! - the margin is subtracted; if that leaves nothing (value <= margin) the
//!   margin is skipped and the raw value is used. This includes
//!   value == margin: a 0.5s header with a 0.5s margin resolves to 0.5s,
//!   never to a zero deadline
//! - the result may exceed what the clock can represent; producers see it
//!   capped at `scrapeguard_core::composite::MAX_DEADLINE`

use std::time::Duration;

use axum::http::HeaderMap;
use tracing::warn;

pub const SCRAPE_TIMEOUT_HEADER: &str = "X-Prometheus-Scrape-Timeout-Seconds";
pub const DEFAULT_SCRAPE_TIMEOUT_SECS: f64 = 10.0;

/// Resolve the scrape deadline from request headers.
pub fn from_headers(headers: &HeaderMap, margin: f64) -> Duration {
    let hint = headers
        .get(SCRAPE_TIMEOUT_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    resolve(hint.as_deref(), margin)
}

/// Resolve the scrape deadline from a raw header value.
pub fn resolve(hint: Option<&str>, margin: f64) -> Duration {
    let secs = match hint.map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_SCRAPE_TIMEOUT_SECS,
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 && Duration::try_from_secs_f64(v).is_ok() => v,
            _ => {
                warn!(
                    header = SCRAPE_TIMEOUT_HEADER,
                    value = raw,
                    default = DEFAULT_SCRAPE_TIMEOUT_SECS,
                    "couldn't parse scrape timeout, using default"
                );
                DEFAULT_SCRAPE_TIMEOUT_SECS
            }
        },
    };

    let margin = margin.max(0.0);
    let margined = secs - margin;
    if margined <= 0.0 {
        warn!(timeout = secs, margin, "timeout margin leaves no time to scrape, margin not applied");
        return Duration::from_secs_f64(secs);
    }

    Duration::from_secs_f64(margined)
}
