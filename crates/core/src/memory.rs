// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process lock store
//!
//! Holds entries in a shared map and honours expiry against a [`Clock`]. Every
//! operation runs under one mutex, which gives the same atomicity the contract
//! demands of a networked store. Clones share the same map.

use crate::clock::{saturating_after, Clock, SystemClock};
use crate::store::{LockStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct Entry {
    token: String,
    expires_at: Instant,
}

/// Shared in-memory store with TTL support
#[derive(Clone, Debug)]
pub struct MemoryStore<C: Clock = SystemClock> {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    clock: C,
}

impl MemoryStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        self.live_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining lifetime of the entry under `key`
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.live_entries()
            .get(key)
            .map(|e| e.expires_at.saturating_duration_since(now))
    }

    /// Write `token` under `key` unconditionally, replacing any holder
    pub fn overwrite(&self, key: &str, token: &str, ttl: Duration) {
        let expires_at = self.expiry(ttl);
        self.live_entries().insert(
            key.to_string(),
            Entry {
                token: token.to_string(),
                expires_at,
            },
        );
    }

    /// Drop `key` as if its TTL had elapsed
    pub fn expire(&self, key: &str) {
        self.live_entries().remove(key);
    }

    /// Lock the map and purge anything past its expiry
    fn live_entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, e| e.expires_at > now);
        entries
    }

    fn expiry(&self, ttl: Duration) -> Instant {
        saturating_after(self.clock.now(), ttl)
    }
}

impl<C: Clock> LockStore for MemoryStore<C> {
    fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let expires_at = self.expiry(ttl);
        let mut entries = self.live_entries();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                token: token.to_string(),
                expires_at,
            },
        );
        Ok(true)
    }

    fn try_release(&self, key: &str, token: &str) -> Result<bool, StoreError> {
        let mut entries = self.live_entries();
        match entries.get(key) {
            None => Err(StoreError::KeyMissing {
                key: key.to_string(),
            }),
            Some(entry) if entry.token == token => {
                entries.remove(key);
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let expires_at = self.expiry(ttl);
        let mut entries = self.live_entries();
        match entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = expires_at;
                Ok(())
            }
            None => Err(StoreError::KeyMissing {
                key: key.to_string(),
            }),
        }
    }

    fn current_token(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.live_entries().get(key).map(|e| e.token.clone()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
