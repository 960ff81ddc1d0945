// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ownership token generation
//!
//! A fresh token is minted for every new acquisition attempt. The token is the
//! value written under the lock key and later proves continued ownership.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates ownership tokens
pub trait TokenGen: Clone + Send + Sync + 'static {
    fn next(&self) -> String;
}

/// Random 128-bit tokens for production use
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidTokenGen;

impl TokenGen for UuidTokenGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Predictable tokens for tests
#[derive(Clone, Debug)]
pub struct SequentialTokenGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialTokenGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of tokens handed out so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst) - 1
    }
}

impl Default for SequentialTokenGen {
    fn default() -> Self {
        Self::new("token")
    }
}

impl TokenGen for SequentialTokenGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_tokens_are_unique() {
        let tokens = UuidTokenGen;
        let t1 = tokens.next();
        let t2 = tokens.next();
        assert_ne!(t1, t2);
        assert_eq!(t1.len(), 36);
    }

    #[test]
    fn sequential_tokens_are_predictable_and_shared() {
        let tokens = SequentialTokenGen::new("t");
        let shared = tokens.clone();
        assert_eq!(tokens.next(), "t-1");
        assert_eq!(shared.next(), "t-2");
        assert_eq!(tokens.issued(), 2);
    }
}
