#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use scrapeguard_core::ScrapeGuardError;
use scrapeguard_exporter::dispatch::ConcurrencyGate;

#[test]
fn second_acquire_fails_immediately() {
    let gate = ConcurrencyGate::new();
    let held = gate.try_acquire().expect("first acquire");
    assert_eq!(gate.available(), 0);

    let err = gate.try_acquire().expect_err("gate is held");
    assert!(matches!(err, ScrapeGuardError::CapacityExhausted));
    assert_eq!(err.client_code().as_str(), "UNAVAILABLE");

    drop(held);
    assert_eq!(gate.available(), 1);
    gate.try_acquire().expect("released");
}

#[test]
fn clones_share_the_same_slot() {
    let gate = ConcurrencyGate::new();
    let other = gate.clone();
    let _held = gate.try_acquire().unwrap();
    assert!(other.try_acquire().is_err());
}

#[test]
fn panic_in_guarded_section_releases_the_slot() {
    let gate = ConcurrencyGate::new();
    let permit = gate.try_acquire().unwrap();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _permit = permit;
        panic!("collector blew up");
    }));
    assert!(result.is_err());

    assert_eq!(gate.available(), 1);
    gate.try_acquire().expect("not leaked");
}

#[test]
fn permit_crosses_threads() {
    let gate = ConcurrencyGate::new();
    let permit = gate.try_acquire().unwrap();

    std::thread::spawn(move || drop(permit)).join().unwrap();
    assert_eq!(gate.available(), 1);
}
