// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod contend;
pub mod run;
pub mod status;

use anyhow::{Context, Result};
use dlock_adapters::{RedisStore, TracedStore};

/// Open the configured Redis server, traced
pub fn open_redis(url: &str) -> Result<TracedStore<RedisStore>> {
    let store = RedisStore::open(url).with_context(|| format!("invalid redis url {url}"))?;
    Ok(TracedStore::new(store))
}

/// Commands that talk to other processes need a shared store
pub fn require_redis(url: Option<&str>) -> Result<&str> {
    url.context("no store configured: pass --redis, set DLOCK_REDIS_URL, or set [store] url")
}
