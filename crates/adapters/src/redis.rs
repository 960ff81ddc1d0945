// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed lock store
//!
//! - acquire: `SET key token NX PX ttl`
//! - release: Lua compare-and-delete, one round trip, atomic on the server
//! - refresh: `PEXPIRE key ttl`
//! - current token: `GET key`

use dlock_core::{LockStore, StoreError};
use redis::{Client, Connection, Script};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Returns 1 when deleted, 0 when held under another token, -1 when absent
const RELEASE_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
    return -1
end
if current == ARGV[1] then
    redis.call('DEL', KEYS[1])
    return 1
end
return 0
"#;

struct Inner {
    client: Client,
    connection: Mutex<Option<Connection>>,
    release: Script,
}

/// Lock store talking to a single Redis server
#[derive(Clone)]
pub struct RedisStore {
    inner: Arc<Inner>,
}

impl RedisStore {
    /// Connect lazily to `url` (`redis://host:port/db`)
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(StoreError::transport)?;
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                connection: Mutex::new(None),
                release: Script::new(RELEASE_SCRIPT),
            }),
        })
    }

    /// Run `f` on the shared connection, reconnecting if needed.
    ///
    /// A connection that failed mid-command is discarded so the next call
    /// starts clean.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> redis::RedisResult<T>,
    ) -> Result<T, StoreError> {
        let mut slot = self
            .inner
            .connection
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            let connection = self
                .inner
                .client
                .get_connection()
                .map_err(StoreError::transport)?;
            *slot = Some(connection);
        }
        let Some(connection) = slot.as_mut() else {
            return Err(StoreError::transport("redis connection unavailable"));
        };

        match f(connection) {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_io_error() || e.is_connection_dropped() {
                    *slot = None;
                }
                Err(StoreError::transport(e))
            }
        }
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("server", &self.inner.client.get_connection_info().addr)
            .finish()
    }
}

/// Longest TTL sent to the server.
///
/// Redis rejects an expiry whose absolute time overflows a signed 64-bit
/// millisecond count, so anything longer is capped at thirty years.
pub(crate) const MAX_TTL_MILLIS: u64 = 30 * 365 * 24 * 60 * 60 * 1000;

/// Millisecond TTL for PX/PEXPIRE, which reject zero
pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis())
        .unwrap_or(MAX_TTL_MILLIS)
        .clamp(1, MAX_TTL_MILLIS)
}

impl LockStore for RedisStore {
    fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool, StoreError> {
        let reply: Option<String> = self.with_connection(|con| {
            redis::cmd("SET")
                .arg(key)
                .arg(token)
                .arg("NX")
                .arg("PX")
                .arg(ttl_millis(ttl))
                .query(con)
        })?;
        Ok(reply.is_some())
    }

    fn try_release(&self, key: &str, token: &str) -> Result<bool, StoreError> {
        let outcome: i64 = self.with_connection(|con| {
            self.inner.release.key(key).arg(token).invoke(con)
        })?;
        match outcome {
            1 => Ok(true),
            -1 => Err(StoreError::KeyMissing {
                key: key.to_string(),
            }),
            _ => Ok(false),
        }
    }

    fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let updated: i64 = self.with_connection(|con| {
            redis::cmd("PEXPIRE")
                .arg(key)
                .arg(ttl_millis(ttl))
                .query(con)
        })?;
        if updated == 1 {
            Ok(())
        } else {
            Err(StoreError::KeyMissing {
                key: key.to_string(),
            })
        }
    }

    fn current_token(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_connection(|con| redis::cmd("GET").arg(key).query(con))
    }
}

#[cfg(test)]
#[path = "redis_tests.rs"]
mod tests;
