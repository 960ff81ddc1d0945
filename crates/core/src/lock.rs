// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking lock surface shared by every distributed lock
//!
//! Each operation comes in two forms: `*_as` takes the local [`HolderId`]
//! explicitly, the plain form uses the calling thread's id.

use crate::error::LockError;
use crate::holder::HolderId;
use crate::interrupt::Interrupt;
use std::time::Duration;

/// A wait/notify condition bound to a lock.
///
/// There is no cross-process notification mechanism behind a distributed
/// lock, so this type has no values and [`DistributedLock::new_condition`]
/// always fails.
#[derive(Debug)]
pub enum Condition {}

/// Conventional blocking-lock operations
pub trait DistributedLock: Send + Sync {
    /// Store key guarded by this lock
    fn key(&self) -> &str;

    /// Time-to-live applied to the store entry by `lock`
    fn expiry(&self) -> Duration;

    /// Block until acquired. Store errors propagate after the gate is released.
    fn lock_as(&self, holder: &HolderId) -> Result<(), LockError>;

    /// As [`lock_as`](Self::lock_as), cancellable through `interrupt` while
    /// waiting for the gate or between store attempts.
    fn lock_interruptibly_as(
        &self,
        holder: &HolderId,
        interrupt: &Interrupt,
    ) -> Result<(), LockError>;

    /// One bounded attempt; store errors count as "not acquired"
    fn try_lock_for_as(&self, holder: &HolderId, timeout: Duration) -> bool;

    /// Release; verifies ownership against the store first
    fn unlock_as(&self, holder: &HolderId) -> Result<(), LockError>;

    /// Bounded by the lock's own expiry
    fn try_lock_as(&self, holder: &HolderId) -> bool {
        self.try_lock_for_as(holder, self.expiry())
    }

    fn new_condition(&self) -> Result<Condition, LockError> {
        Err(LockError::ConditionUnsupported)
    }

    fn lock(&self) -> Result<(), LockError> {
        self.lock_as(&HolderId::current_thread())
    }

    fn lock_interruptibly(&self, interrupt: &Interrupt) -> Result<(), LockError> {
        self.lock_interruptibly_as(&HolderId::current_thread(), interrupt)
    }

    fn try_lock(&self) -> bool {
        self.try_lock_as(&HolderId::current_thread())
    }

    fn try_lock_for(&self, timeout: Duration) -> bool {
        self.try_lock_for_as(&HolderId::current_thread(), timeout)
    }

    fn unlock(&self) -> Result<(), LockError> {
        self.unlock_as(&HolderId::current_thread())
    }

    /// Lock and return a guard that unlocks on drop
    fn guard(&self) -> Result<LockGuard<'_, Self>, LockError>
    where
        Self: Sized,
    {
        let holder = HolderId::current_thread();
        self.lock_as(&holder)?;
        Ok(LockGuard::new(self, holder))
    }

    /// Timed variant of [`guard`](Self::guard)
    fn try_guard_for(&self, timeout: Duration) -> Option<LockGuard<'_, Self>>
    where
        Self: Sized,
    {
        let holder = HolderId::current_thread();
        self.try_lock_for_as(&holder, timeout)
            .then(|| LockGuard::new(self, holder))
    }
}

/// Scoped ownership of a [`DistributedLock`]
#[must_use = "dropping the guard releases the lock immediately"]
pub struct LockGuard<'a, L: DistributedLock> {
    lock: &'a L,
    holder: HolderId,
    released: bool,
}

impl<'a, L: DistributedLock> LockGuard<'a, L> {
    pub fn new(lock: &'a L, holder: HolderId) -> Self {
        Self {
            lock,
            holder,
            released: false,
        }
    }

    pub fn holder(&self) -> &HolderId {
        &self.holder
    }

    /// Release now and report the outcome
    pub fn unlock(mut self) -> Result<(), LockError> {
        self.released = true;
        self.lock.unlock_as(&self.holder)
    }
}

impl<L: DistributedLock> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.lock.unlock_as(&self.holder) {
            tracing::warn!(key = self.lock.key(), holder = %self.holder, error = %e, "release on drop failed");
        }
    }
}

impl<L: DistributedLock> std::fmt::Debug for LockGuard<'_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard")
            .field("key", &self.lock.key())
            .field("holder", &self.holder)
            .finish()
    }
}
