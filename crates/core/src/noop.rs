// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock that excludes nobody.
//!
//! Every acquisition succeeds immediately and nothing is written anywhere.
//! Useful as the unprotected baseline when demonstrating lost updates.

use crate::error::LockError;
use crate::holder::HolderId;
use crate::interrupt::Interrupt;
use crate::lock::DistributedLock;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct NoopLock {
    key: String,
}

impl NoopLock {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl DistributedLock for NoopLock {
    fn key(&self) -> &str {
        &self.key
    }

    fn expiry(&self) -> Duration {
        Duration::ZERO
    }

    fn lock_as(&self, _holder: &HolderId) -> Result<(), LockError> {
        Ok(())
    }

    fn lock_interruptibly_as(
        &self,
        _holder: &HolderId,
        _interrupt: &Interrupt,
    ) -> Result<(), LockError> {
        Ok(())
    }

    fn try_lock_for_as(&self, _holder: &HolderId, _timeout: Duration) -> bool {
        true
    }

    fn unlock_as(&self, _holder: &HolderId) -> Result<(), LockError> {
        Ok(())
    }
}
