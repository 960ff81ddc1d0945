// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lock surface

use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by lock and unlock operations
#[derive(Debug, Error)]
pub enum LockError {
    /// The caller does not hold the local gate for this lock
    #[error("current holder does not hold lock {key}")]
    NotHeld { key: String },
    /// Unlock called more times than lock on a reentrant lock
    #[error("unbalanced unlock on {key}: hold count is already zero")]
    Unbalanced { key: String },
    /// Hold counter would overflow on re-entry
    #[error("maximum hold count exceeded on {key}")]
    HoldOverflow { key: String },
    /// A non-reentrant lock was requested again by its own holder
    #[error("cannot lock twice on non-reentrant lock {key}")]
    AlreadyHeld { key: String },
    /// The store no longer carries this instance's ownership token
    #[error("ownership of {key} was lost before release")]
    OwnershipLost { key: String },
    #[error("lock acquisition interrupted")]
    Interrupted,
    #[error("conditions are not supported on distributed locks")]
    ConditionUnsupported,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LockError {
    /// Usage errors indicate a caller bug and are never worth retrying
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            LockError::NotHeld { .. } | LockError::Unbalanced { .. } | LockError::AlreadyHeld { .. }
        )
    }
}
