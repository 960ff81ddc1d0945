// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative interruption for blocking lock calls
//!
//! An [`Interrupt`] is shared between the thread that blocks in
//! `lock_interruptibly` and whoever wants it to give up (a signal handler, a
//! supervisor). Triggering it wakes every wait registered against it. Once
//! triggered it stays triggered until [`Interrupt::reset`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

type Waker = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    triggered: Mutex<bool>,
    sleepers: Condvar,
    wakers: Mutex<HashMap<u64, Waker>>,
    next_waker: AtomicU64,
}

/// Cloneable cancellation handle
#[derive(Clone)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                triggered: Mutex::new(false),
                sleepers: Condvar::new(),
                wakers: Mutex::new(HashMap::new()),
                next_waker: AtomicU64::new(0),
            }),
        }
    }

    /// Cancel every current and future wait on this handle
    pub fn interrupt(&self) {
        *self.inner.triggered.lock().unwrap_or_else(|e| e.into_inner()) = true;
        self.inner.sleepers.notify_all();

        let wakers: Vec<Waker> = self
            .inner
            .wakers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        for wake in wakers {
            wake();
        }
    }

    pub fn is_interrupted(&self) -> bool {
        *self.inner.triggered.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Re-arm the handle
    pub fn reset(&self) {
        *self.inner.triggered.lock().unwrap_or_else(|e| e.into_inner()) = false;
    }

    /// Sleep for `duration` unless interrupted first.
    ///
    /// Returns `false` when the sleep was cut short.
    pub fn sleep(&self, duration: Duration) -> bool {
        let triggered = self.inner.triggered.lock().unwrap_or_else(|e| e.into_inner());
        let (triggered, _) = self
            .inner
            .sleepers
            .wait_timeout_while(triggered, duration, |t| !*t)
            .unwrap_or_else(|e| e.into_inner());
        !*triggered
    }

    /// Register `wake` to run on interrupt until the returned registration drops.
    ///
    /// `wake` must take the waiter's own lock before notifying, so a wakeup
    /// cannot slip in between the waiter's check and its wait.
    pub(crate) fn register(&self, wake: impl Fn() + Send + Sync + 'static) -> Registration {
        let id = self.inner.next_waker.fetch_add(1, Ordering::Relaxed);
        self.inner
            .wakers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Arc::new(wake));
        Registration {
            inner: Arc::clone(&self.inner),
            id,
        }
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interrupt")
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

/// Live waker registration; deregisters on drop
pub(crate) struct Registration {
    inner: Arc<Inner>,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.inner
            .wakers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

#[cfg(test)]
#[path = "interrupt_tests.rs"]
mod tests;
