// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! dlock-core: mutual exclusion coordinated through a shared key-value store
//!
//! This crate provides:
//! - A per-instance local gate serializing threads of one process
//! - The store contract (`LockStore`) and an in-memory implementation
//! - Non-reentrant and reentrant distributed mutexes over that contract
//! - Lock configuration with humantime durations

pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod holder;
pub mod interrupt;
pub mod lock;
pub mod memory;
pub mod mutex;
pub mod noop;
pub mod reentrant;
pub mod store;
pub mod token;

mod handshake;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod fake;

// Re-exports
pub use clock::{Clock, Deadline, FakeClock, SystemClock};
pub use config::{ConfigError, LockConfig, DEFAULT_EXPIRY, DEFAULT_WAIT_INTERVAL};
pub use error::LockError;
pub use gate::{Gate, GateError};
pub use holder::HolderId;
pub use interrupt::Interrupt;
pub use lock::{Condition, DistributedLock, LockGuard};
pub use memory::MemoryStore;
pub use mutex::DistributedMutex;
pub use noop::NoopLock;
pub use reentrant::ReentrantDistributedMutex;
pub use store::{LockStore, StoreError};
pub use token::{SequentialTokenGen, TokenGen, UuidTokenGen};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};
