// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local holder identity
//!
//! The gate and the reentrant hold counter are keyed by a `HolderId` rather than
//! by an implicit thread handle. Callers on threads get a stable per-thread id
//! for free; callers on task schedulers pass their own.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a local lock holder
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolderId(pub String);

static NEXT_THREAD: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_HOLDER: HolderId =
        HolderId(format!("thread-{}", NEXT_THREAD.fetch_add(1, Ordering::Relaxed)));
}

impl HolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id of the calling thread; stable for the thread's lifetime
    pub fn current_thread() -> Self {
        THREAD_HOLDER.with(Clone::clone)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
