#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use scrapeguard_exporter::dispatch::timeout::{
    from_headers, resolve, DEFAULT_SCRAPE_TIMEOUT_SECS, SCRAPE_TIMEOUT_HEADER,
};

const MARGIN: f64 = 0.5;

#[test]
fn header_value_minus_margin() {
    for (hint, want) in [("15", 14.5), ("10", 9.5), ("2.5", 2.0), ("0.75", 0.25), ("120", 119.5)] {
        let got = resolve(Some(hint), MARGIN);
        assert!((got.as_secs_f64() - want).abs() < 1e-9, "{hint}: {got:?}");
    }
}

#[test]
fn absent_or_malformed_falls_back_to_default() {
    let want = Duration::from_secs_f64(DEFAULT_SCRAPE_TIMEOUT_SECS - MARGIN);
    assert_eq!(want, Duration::from_millis(9500));

    for hint in [None, Some(""), Some("  "), Some("abc"), Some("1s"), Some("NaN"), Some("inf"), Some("0"), Some("-3"), Some("1e300")] {
        assert_eq!(resolve(hint, MARGIN), want, "{hint:?}");
    }
}

#[test]
fn margin_is_skipped_when_it_would_consume_the_budget() {
    assert_eq!(resolve(Some("0.3"), MARGIN), Duration::from_secs_f64(0.3));
    assert_eq!(resolve(Some("0.5"), MARGIN), Duration::from_secs_f64(0.5));
}

#[test]
fn zero_margin_uses_value_as_is() {
    assert_eq!(resolve(Some("7"), 0.0), Duration::from_secs(7));
}

#[test]
fn reads_prometheus_header() {
    let name: HeaderName = SCRAPE_TIMEOUT_HEADER.parse().unwrap();
    let mut headers = HeaderMap::new();
    assert_eq!(from_headers(&headers, MARGIN), Duration::from_millis(9500));

    headers.insert(name.clone(), HeaderValue::from_static("4"));
    assert_eq!(from_headers(&headers, MARGIN), Duration::from_millis(3500));

    headers.insert(name.clone(), HeaderValue::from_bytes(b"\xff\xfe").unwrap());
    assert_eq!(from_headers(&headers, MARGIN), Duration::from_millis(9500));
}
