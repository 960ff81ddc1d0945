// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store contract for the shared key-value authority
//!
//! Every mutating call is a single atomic operation on the store side. In
//! particular, release compares and deletes in one step so that an entry that
//! expired and was re-acquired by someone else is never removed.

use std::time::Duration;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The client could not complete the call
    #[error("store transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The key does not exist at all
    #[error("lock key not present: {key}")]
    KeyMissing { key: String },
}

impl StoreError {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Transport(err.into())
    }
}

/// Atomic key-value operations the lock protocol relies on
pub trait LockStore: Clone + Send + Sync + 'static {
    /// Insert `token` under `key` with expiry `ttl` only if `key` is absent.
    ///
    /// Returns whether the insert happened.
    fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Delete `key` only if its current value equals `token`.
    ///
    /// Returns whether the delete happened. A missing key is
    /// [`StoreError::KeyMissing`], distinct from a key held under another token.
    fn try_release(&self, key: &str, token: &str) -> Result<bool, StoreError>;

    /// Reset the expiry of `key` without touching its value.
    ///
    /// A missing key is [`StoreError::KeyMissing`].
    fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError>;

    /// The token currently stored under `key`, if any
    fn current_token(&self, key: &str) -> Result<Option<String>, StoreError>;
}
