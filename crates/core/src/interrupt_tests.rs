// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::AtomicUsize;
use std::time::Instant;

#[test]
fn sleep_runs_to_completion_when_not_interrupted() {
    let interrupt = Interrupt::new();
    let start = Instant::now();
    assert!(interrupt.sleep(Duration::from_millis(20)));
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn interrupt_cuts_sleep_short() {
    let interrupt = Interrupt::new();
    let remote = interrupt.clone();

    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        remote.interrupt();
    });

    let start = Instant::now();
    assert!(!interrupt.sleep(Duration::from_secs(10)));
    assert!(start.elapsed() < Duration::from_secs(5));
    handle.join().unwrap();
}

#[test]
fn triggered_interrupt_stays_triggered_until_reset() {
    let interrupt = Interrupt::new();
    interrupt.interrupt();
    assert!(interrupt.is_interrupted());
    assert!(!interrupt.sleep(Duration::from_secs(10)));

    interrupt.reset();
    assert!(!interrupt.is_interrupted());
    assert!(interrupt.sleep(Duration::from_millis(1)));
}

#[test]
fn registered_wakers_fire_until_dropped() {
    let interrupt = Interrupt::new();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&fired);
    let registration = interrupt.register(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    interrupt.interrupt();
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    drop(registration);
    interrupt.interrupt();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
