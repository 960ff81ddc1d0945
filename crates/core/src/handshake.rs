// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store-side half of the lock protocol
//!
//! Mints tokens, performs the conditional insert (with the contention retry
//! loop) and the conditional delete. Local bookkeeping stays with the callers.

use crate::error::LockError;
use crate::interrupt::Interrupt;
use crate::store::{LockStore, StoreError};
use crate::token::TokenGen;
use std::time::Duration;

#[derive(Debug)]
pub(crate) struct Handshake<S, G> {
    store: S,
    key: String,
    tokens: G,
    wait_interval: Duration,
}

impl<S: LockStore, G: TokenGen> Handshake<S, G> {
    pub(crate) fn new(store: S, key: String, tokens: G, wait_interval: Duration) -> Self {
        Self {
            store,
            key,
            tokens,
            wait_interval,
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// One conditional insert under a fresh token
    pub(crate) fn attempt(&self, ttl: Duration) -> Result<Option<String>, StoreError> {
        let token = self.tokens.next();
        if self.store.try_acquire(&self.key, &token, ttl)? {
            tracing::debug!(key = %self.key, token = %token, ttl_ms = ttl.as_millis() as u64, "acquired");
            Ok(Some(token))
        } else {
            Ok(None)
        }
    }

    /// Retry [`attempt`](Self::attempt) every wait interval until it succeeds.
    ///
    /// With an interrupt the pause between attempts is cancellable.
    pub(crate) fn acquire(
        &self,
        ttl: Duration,
        interrupt: Option<&Interrupt>,
    ) -> Result<String, LockError> {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            if let Some(token) = self.attempt(ttl)? {
                return Ok(token);
            }
            tracing::trace!(key = %self.key, attempts, "contended, waiting");
            match interrupt {
                Some(interrupt) => {
                    if !interrupt.sleep(self.wait_interval) {
                        tracing::debug!(key = %self.key, attempts, "interrupted between attempts");
                        return Err(LockError::Interrupted);
                    }
                }
                None => std::thread::sleep(self.wait_interval),
            }
        }
    }

    /// Reset the entry's expiry, mapping a vanished key to ownership loss
    pub(crate) fn refresh(&self, ttl: Duration) -> Result<(), LockError> {
        match self.store.refresh_expiry(&self.key, ttl) {
            Ok(()) => {
                tracing::debug!(key = %self.key, ttl_ms = ttl.as_millis() as u64, "expiry refreshed");
                Ok(())
            }
            Err(StoreError::KeyMissing { .. }) => {
                tracing::warn!(key = %self.key, "entry vanished before refresh");
                Err(self.lost())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the store still carries `token`
    pub(crate) fn is_current(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.store.current_token(&self.key)?.as_deref() == Some(token))
    }

    /// Fencing check without mutation
    pub(crate) fn verify(&self, token: &str) -> Result<(), LockError> {
        if self.is_current(token)? {
            Ok(())
        } else {
            tracing::warn!(key = %self.key, token, "ownership lost");
            Err(self.lost())
        }
    }

    /// Atomic compare-and-delete of the entry written under `token`
    pub(crate) fn release(&self, token: &str) -> Result<(), LockError> {
        match self.store.try_release(&self.key, token) {
            Ok(true) => {
                tracing::debug!(key = %self.key, token, "released");
                Ok(())
            }
            Ok(false) => {
                tracing::warn!(key = %self.key, token, "entry now held under another token");
                Err(self.lost())
            }
            Err(StoreError::KeyMissing { .. }) => {
                tracing::warn!(key = %self.key, token, "entry expired before release");
                Err(self.lost())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn lost(&self) -> LockError {
        LockError::OwnershipLost {
            key: self.key.clone(),
        }
    }
}
