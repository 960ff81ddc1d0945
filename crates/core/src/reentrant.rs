// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reentrant distributed mutex
//!
//! The first acquisition by a holder runs the full store handshake and sets
//! the hold count to one. Further acquisitions by the same holder only bump
//! the count and push the entry's expiry out; the token is kept. The entry is
//! deleted when the count drops back to zero.

use crate::clock::Deadline;
use crate::config::LockConfig;
use crate::error::LockError;
use crate::gate::Gate;
use crate::handshake::Handshake;
use crate::holder::HolderId;
use crate::interrupt::Interrupt;
use crate::lock::DistributedLock;
use crate::mutex::entry_ttl;
use crate::store::LockStore;
use crate::token::{TokenGen, UuidTokenGen};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Token and hold count of the gate holder.
///
/// `count > 0` exactly when `token` is set.
#[derive(Debug, Default)]
struct Hold {
    token: Option<String>,
    count: u32,
}

impl Hold {
    fn clear(&mut self) -> Option<String> {
        self.count = 0;
        self.token.take()
    }
}

/// Distributed mutex that its holder may acquire repeatedly
#[derive(Debug)]
pub struct ReentrantDistributedMutex<S, G = UuidTokenGen> {
    handshake: Handshake<S, G>,
    gate: Gate,
    expiry: Duration,
    hold: Mutex<Hold>,
}

impl<S: LockStore> ReentrantDistributedMutex<S> {
    pub fn new(store: S, config: LockConfig) -> Self {
        Self::with_tokens(store, config, UuidTokenGen)
    }
}

impl<S: LockStore, G: TokenGen> ReentrantDistributedMutex<S, G> {
    pub fn with_tokens(store: S, config: LockConfig, tokens: G) -> Self {
        Self {
            handshake: Handshake::new(store, config.key, tokens, config.wait_interval),
            gate: Gate::new(),
            expiry: config.expiry,
            hold: Mutex::new(Hold::default()),
        }
    }

    pub fn store(&self) -> &S {
        self.handshake.store()
    }

    pub fn token(&self) -> Option<String> {
        self.hold().token.clone()
    }

    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    pub fn is_held_by(&self, holder: &HolderId) -> bool {
        self.gate.is_held_by(holder)
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        self.gate.is_held_by_current_thread()
    }

    /// Holds outstanding for `holder`, zero if it does not own the lock
    pub fn hold_count_of(&self, holder: &HolderId) -> u32 {
        if self.gate.is_held_by(holder) {
            self.hold().count
        } else {
            0
        }
    }

    /// Holds outstanding for the calling thread
    pub fn hold_count(&self) -> u32 {
        self.hold_count_of(&HolderId::current_thread())
    }

    /// Re-read the store and compare with the local token
    pub fn is_owned(&self) -> Result<bool, LockError> {
        match self.token() {
            Some(token) => Ok(self.handshake.is_current(&token)?),
            None => Ok(false),
        }
    }

    fn hold(&self) -> MutexGuard<'_, Hold> {
        self.hold.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn release_gate(&self, holder: &HolderId) {
        if let Err(e) = self.gate.release(holder) {
            tracing::error!(key = self.key(), error = %e, "gate release failed");
        }
    }

    /// Re-entry fast path. `None` when `holder` does not own the lock yet.
    ///
    /// The store refresh runs without the `hold` lock; only the gate holder
    /// mutates `Hold`, so the count read before the refresh is still current.
    fn reenter(&self, holder: &HolderId, ttl: Duration) -> Option<Result<(), LockError>> {
        if !self.gate.is_held_by(holder) {
            return None;
        }
        let current = self.hold().count;
        if current == 0 {
            return Some(Err(LockError::Unbalanced {
                key: self.key().to_string(),
            }));
        }
        let Some(count) = current.checked_add(1) else {
            return Some(Err(LockError::HoldOverflow {
                key: self.key().to_string(),
            }));
        };
        if let Err(e) = self.handshake.refresh(ttl) {
            return Some(Err(e));
        }
        self.hold().count = count;
        tracing::debug!(key = self.key(), %holder, count, "re-entered");
        Some(Ok(()))
    }

    /// First entry: blocking handshake with the gate already owned
    fn enter(&self, holder: &HolderId, interrupt: Option<&Interrupt>) -> Result<(), LockError> {
        match self.handshake.acquire(self.expiry, interrupt) {
            Ok(token) => {
                let mut hold = self.hold();
                hold.token = Some(token);
                hold.count = 1;
                Ok(())
            }
            Err(e) => {
                self.release_gate(holder);
                Err(e)
            }
        }
    }
}

impl<S: LockStore, G: TokenGen> DistributedLock for ReentrantDistributedMutex<S, G> {
    fn key(&self) -> &str {
        self.handshake.key()
    }

    fn expiry(&self) -> Duration {
        self.expiry
    }

    fn lock_as(&self, holder: &HolderId) -> Result<(), LockError> {
        if let Some(result) = self.reenter(holder, self.expiry) {
            return result;
        }
        self.gate.acquire(holder);
        self.enter(holder, None)
    }

    fn lock_interruptibly_as(
        &self,
        holder: &HolderId,
        interrupt: &Interrupt,
    ) -> Result<(), LockError> {
        if interrupt.is_interrupted() {
            return Err(LockError::Interrupted);
        }
        if let Some(result) = self.reenter(holder, self.expiry) {
            return result;
        }
        self.gate
            .acquire_interruptibly(holder, interrupt)
            .map_err(|_| LockError::Interrupted)?;
        self.enter(holder, Some(interrupt))
    }

    fn try_lock_for_as(&self, holder: &HolderId, timeout: Duration) -> bool {
        let ttl = entry_ttl(timeout, self.expiry);
        if let Some(result) = self.reenter(holder, ttl) {
            if let Err(e) = &result {
                tracing::debug!(key = self.key(), error = %e, "re-entry failed");
            }
            return result.is_ok();
        }

        let deadline = Deadline::after(timeout);
        if !self.gate.try_acquire_until(holder, deadline) {
            return false;
        }
        if !timeout.is_zero() && deadline.is_expired() {
            self.release_gate(holder);
            return false;
        }

        match self.handshake.attempt(ttl) {
            Ok(Some(token)) => {
                let mut hold = self.hold();
                hold.token = Some(token);
                hold.count = 1;
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

        let (token, count) = {
            let hold = self.hold();
            (hold.token.clone(), hold.count)
        };
        let Some(token) = token.filter(|_| count > 0) else {
            return Err(LockError::Unbalanced {
                key: self.key().to_string(),
            });
        };

        if count > 1 {
            return match self.handshake.verify(&token) {
                Ok(()) => {
                    self.hold().count = count - 1;
                    tracing::debug!(key = self.key(), %holder, count = count - 1, "hold released");
                    Ok(())
                }
                Err(e @ LockError::OwnershipLost { .. }) => {
                    self.hold().clear();
                    self.release_gate(holder);
                    Err(e)
                }
                Err(e) => Err(e),
            };
        }

        self.hold().clear();
        let result = self.handshake.release(&token);
        self.release_gate(holder);
        result
    }
}

#[cfg(test)]
#[path = "reentrant_tests.rs"]
mod tests;
