// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lock store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::clock::FakeClock;
use crate::memory::MemoryStore;
use crate::store::{LockStore, StoreError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Acquire {
        key: String,
        token: String,
        ttl: Duration,
    },
    Release {
        key: String,
        token: String,
    },
    Refresh {
        key: String,
        ttl: Duration,
    },
    CurrentToken {
        key: String,
    },
}

#[derive(Debug, Default)]
struct Faults {
    acquire: Option<String>,
    release: Option<String>,
    refresh: Option<String>,
}

/// Memory-backed store that records calls and injects transport failures
#[derive(Clone, Debug)]
pub struct FakeStore {
    inner: MemoryStore<FakeClock>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    faults: Arc<Mutex<Faults>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::with_clock(FakeClock::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    pub fn clock(&self) -> &FakeClock {
        self.inner.clock()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Count of conditional inserts attempted
    pub fn acquire_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Acquire { .. }))
            .count()
    }

    /// Count of conditional deletes attempted
    pub fn release_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Release { .. }))
            .count()
    }

    /// Value stored under `key`, bypassing call recording
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.current_token(key).ok().flatten()
    }

    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.inner.ttl(key)
    }

    /// Simulate another process taking `key` over
    pub fn overwrite(&self, key: &str, token: &str, ttl: Duration) {
        self.inner.overwrite(key, token, ttl);
    }

    /// Simulate the entry under `key` timing out
    pub fn expire(&self, key: &str) {
        self.inner.expire(key);
    }

    /// Make every `try_acquire` fail with a transport error
    pub fn fail_acquire(&self, message: impl Into<String>) {
        self.faults().acquire = Some(message.into());
    }

    /// Make every `try_release` fail with a transport error
    pub fn fail_release(&self, message: impl Into<String>) {
        self.faults().release = Some(message.into());
    }

    /// Make every `refresh_expiry` fail with a transport error
    pub fn fail_refresh(&self, message: impl Into<String>) {
        self.faults().refresh = Some(message.into());
    }

    /// Remove all injected failures
    pub fn heal(&self) {
        *self.faults() = Faults::default();
    }

    fn faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl Default for FakeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LockStore for FakeStore {
    fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.record(StoreCall::Acquire {
            key: key.to_string(),
            token: token.to_string(),
            ttl,
        });
        if let Some(message) = self.faults().acquire.clone() {
            return Err(StoreError::transport(message));
        }
        self.inner.try_acquire(key, token, ttl)
    }

    fn try_release(&self, key: &str, token: &str) -> Result<bool, StoreError> {
        self.record(StoreCall::Release {
            key: key.to_string(),
            token: token.to_string(),
        });
        if let Some(message) = self.faults().release.clone() {
            return Err(StoreError::transport(message));
        }
        self.inner.try_release(key, token)
    }

    fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        self.record(StoreCall::Refresh {
            key: key.to_string(),
            ttl,
        });
        if let Some(message) = self.faults().refresh.clone() {
            return Err(StoreError::transport(message));
        }
        self.inner.refresh_expiry(key, ttl)
    }

    fn current_token(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.record(StoreCall::CurrentToken {
            key: key.to_string(),
        });
        self.inner.current_token(key)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
