// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert!(t2.duration_since(t1) >= Duration::from_secs(30));
}

#[test]
fn deadline_counts_down_to_zero() {
    let deadline = Deadline::after(Duration::from_millis(20));
    assert!(!deadline.is_expired());
    assert!(deadline.remaining() <= Duration::from_millis(20));

    std::thread::sleep(Duration::from_millis(30));
    assert!(deadline.is_expired());
    assert_eq!(deadline.remaining(), Duration::ZERO);
}

#[test]
fn zero_budget_deadline_is_already_expired() {
    let deadline = Deadline::after(Duration::ZERO);
    assert!(deadline.is_expired());
}

#[test]
fn huge_budget_does_not_overflow() {
    let deadline = Deadline::after(Duration::MAX);
    assert!(!deadline.is_expired());
}

#[test]
fn saturating_after_keeps_oversized_spans_in_the_future() {
    let now = Instant::now();
    let later = saturating_after(now, Duration::MAX);
    assert!(later > now);
    assert!(later.duration_since(now) >= Duration::from_secs(60 * 60 * 24 * 365));
}
