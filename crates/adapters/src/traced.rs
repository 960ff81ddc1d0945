// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use dlock_core::{LockStore, StoreError};
use std::time::{Duration, Instant};

/// Wrapper that adds tracing to any LockStore
#[derive(Clone, Debug)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

impl<S: LockStore> LockStore for TracedStore<S> {
    fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.try_acquire", key, token);
        let _guard = span.enter();

        // Precondition: a zero TTL would never be visible to anyone
        if ttl.is_zero() {
            tracing::warn!("zero ttl requested");
        }

        let start = Instant::now();
        let result = self.inner.try_acquire(key, token, ttl);

        match &result {
            Ok(true) => tracing::info!(
                ttl_ms = ttl.as_millis() as u64,
                elapsed_ms = elapsed_ms(start),
                "acquired"
            ),
            Ok(false) => tracing::debug!(elapsed_ms = elapsed_ms(start), "key busy"),
            Err(e) => tracing::error!(elapsed_ms = elapsed_ms(start), error = %e, "acquire failed"),
        }

        result
    }

    fn try_release(&self, key: &str, token: &str) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.try_release", key, token);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.try_release(key, token);

        match &result {
            Ok(true) => tracing::info!(elapsed_ms = elapsed_ms(start), "released"),
            Ok(false) => tracing::warn!("held under another token, not deleted"),
            // Missing key usually means the entry expired first
            Err(StoreError::KeyMissing { .. }) => tracing::warn!("key already gone"),
            Err(e) => tracing::error!(elapsed_ms = elapsed_ms(start), error = %e, "release failed"),
        }

        result
    }

    fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.refresh_expiry", key);
        let _guard = span.enter();

        let result = self.inner.refresh_expiry(key, ttl);
        match &result {
            Ok(()) => tracing::debug!(ttl_ms = ttl.as_millis() as u64, "refreshed"),
            Err(e) => tracing::warn!(error = %e, "refresh failed"),
        }

        result
    }

    fn current_token(&self, key: &str) -> Result<Option<String>, StoreError> {
        let result = self.inner.current_token(key);
        tracing::trace!(key, token = ?result.as_ref().ok(), "read");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
