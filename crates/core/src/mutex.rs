// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Non-reentrant distributed mutex
//!
//! Local callers queue on a [`Gate`]; the gate holder then runs the store
//! handshake. The gate is taken strictly before the handshake starts and given
//! back strictly after it ends, on every path out of every operation.

use crate::clock::Deadline;
use crate::config::LockConfig;
use crate::error::LockError;
use crate::gate::Gate;
use crate::handshake::Handshake;
use crate::holder::HolderId;
use crate::interrupt::Interrupt;
use crate::lock::DistributedLock;
use crate::store::LockStore;
use crate::token::{TokenGen, UuidTokenGen};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Distributed mutex without re-entry
#[derive(Debug)]
pub struct DistributedMutex<S, G = UuidTokenGen> {
    handshake: Handshake<S, G>,
    gate: Gate,
    expiry: Duration,
    token: Mutex<Option<String>>,
}

impl<S: LockStore> DistributedMutex<S> {
    pub fn new(store: S, config: LockConfig) -> Self {
        Self::with_tokens(store, config, UuidTokenGen)
    }
}

impl<S: LockStore, G: TokenGen> DistributedMutex<S, G> {
    pub fn with_tokens(store: S, config: LockConfig, tokens: G) -> Self {
        Self {
            handshake: Handshake::new(store, config.key, tokens, config.wait_interval),
            gate: Gate::new(),
            expiry: config.expiry,
            token: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &S {
        self.handshake.store()
    }

    /// Ownership token of the current acquisition, if any
    pub fn token(&self) -> Option<String> {
        self.local_token().clone()
    }

    /// Whether some local holder owns this instance
    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    pub fn is_held_by(&self, holder: &HolderId) -> bool {
        self.gate.is_held_by(holder)
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        self.gate.is_held_by_current_thread()
    }

    /// Re-read the store and compare with the local token
    pub fn is_owned(&self) -> Result<bool, LockError> {
        match self.token() {
            Some(token) => Ok(self.handshake.is_current(&token)?),
            None => Ok(false),
        }
    }

    fn local_token(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn release_gate(&self, holder: &HolderId) {
        if let Err(e) = self.gate.release(holder) {
            tracing::error!(key = self.key(), error = %e, "gate release failed");
        }
    }

    /// Run the blocking handshake while owning the gate; undo the gate on failure
    fn finish_acquire(
        &self,
        holder: &HolderId,
        interrupt: Option<&Interrupt>,
    ) -> Result<(), LockError> {
        match self.handshake.acquire(self.expiry, interrupt) {
            Ok(token) => {
                *self.local_token() = Some(token);
                Ok(())
            }
            Err(e) => {
                self.release_gate(holder);
                Err(e)
            }
        }
    }
}

impl<S: LockStore, G: TokenGen> DistributedLock for DistributedMutex<S, G> {
    fn key(&self) -> &str {
        self.handshake.key()
    }

    fn expiry(&self) -> Duration {
        self.expiry
    }

    fn lock_as(&self, holder: &HolderId) -> Result<(), LockError> {
        if self.gate.is_held_by(holder) {
            return Err(LockError::AlreadyHeld {
                key: self.key().to_string(),
            });
        }
        self.gate.acquire(holder);
        self.finish_acquire(holder, None)
    }

    fn lock_interruptibly_as(
        &self,
        holder: &HolderId,
        interrupt: &Interrupt,
    ) -> Result<(), LockError> {
        if self.gate.is_held_by(holder) {
            return Err(LockError::AlreadyHeld {
                key: self.key().to_string(),
            });
        }
        self.gate
            .acquire_interruptibly(holder, interrupt)
            .map_err(|_| LockError::Interrupted)?;
        self.finish_acquire(holder, Some(interrupt))
    }

    fn try_lock_for_as(&self, holder: &HolderId, timeout: Duration) -> bool {
        if self.gate.is_held_by(holder) {
            tracing::debug!(key = self.key(), %holder, "already held by caller");
            return false;
        }

        let deadline = Deadline::after(timeout);
        if !self.gate.try_acquire_until(holder, deadline) {
            return false;
        }
        if !timeout.is_zero() && deadline.is_expired() {
            self.release_gate(holder);
            return false;
        }

        match self.handshake.attempt(entry_ttl(timeout, self.expiry)) {
            Ok(Some(token)) => {
                *self.local_token() = Some(token);
                true
            }
            Ok(None) => {
                self.release_gate(holder);
                false
            }
            Err(e) => {
                tracing::debug!(key = self.key(), error = %e, "store error treated as not acquired");
                self.release_gate(holder);
                false
            }
        }
    }

    fn unlock_as(&self, holder: &HolderId) -> Result<(), LockError> {
        if !self.gate.is_held_by(holder) {
            return Err(LockError::NotHeld {
                key: self.key().to_string(),
            });
        }
        let token = self.local_token().take();
        let result = match token {
            Some(token) => self.handshake.release(&token),
            None => Err(LockError::NotHeld {
                key: self.key().to_string(),
            }),
        };
        self.release_gate(holder);
        result
    }
}

/// TTL written by a timed attempt: the caller's budget, or the lock's own
/// expiry when the budget is zero
pub(crate) fn entry_ttl(timeout: Duration, expiry: Duration) -> Duration {
    if timeout.is_zero() {
        expiry
    } else {
        timeout
    }
}

#[cfg(test)]
#[path = "mutex_tests.rs"]
mod tests;
