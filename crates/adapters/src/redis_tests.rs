// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

/// Live tests run only against a server named by DLOCK_REDIS_URL
fn live_store() -> Option<RedisStore> {
    let url = std::env::var("DLOCK_REDIS_URL").ok()?;
    Some(RedisStore::open(&url).unwrap())
}

fn unique_key(name: &str) -> String {
    format!("dlock-test:{}:{}", name, std::process::id())
}

#[test]
fn ttl_is_never_zero_milliseconds() {
    assert_eq!(ttl_millis(Duration::ZERO), 1);
    assert_eq!(ttl_millis(Duration::from_micros(300)), 1);
    assert_eq!(ttl_millis(Duration::from_millis(1500)), 1500);
}

#[test]
fn ttl_millis_caps_oversized_ttls() {
    assert_eq!(ttl_millis(Duration::MAX), MAX_TTL_MILLIS);
    assert_eq!(ttl_millis(Duration::from_millis(u64::MAX)), MAX_TTL_MILLIS);
    assert!(MAX_TTL_MILLIS < i64::MAX as u64 / 2);
    assert_eq!(ttl_millis(Duration::from_secs(3600)), 3_600_000);
}

#[test]
fn open_rejects_malformed_url() {
    let result = RedisStore::open("not a url");
    assert!(matches!(result, Err(StoreError::Transport(_))));
}

#[test]
fn unreachable_server_is_transport_error() {
    let store = RedisStore::open("redis://127.0.0.1:1/").unwrap();
    let result = store.try_acquire("k", "t", Duration::from_secs(1));
    assert!(matches!(result, Err(StoreError::Transport(_))));
}

#[test]
fn live_acquire_release_cycle() {
    let Some(store) = live_store() else {
        eprintln!("Skipping: DLOCK_REDIS_URL not set");
        return;
    };
    let key = unique_key("cycle");

    assert!(store.try_acquire(&key, "a", Duration::from_secs(5)).unwrap());
    assert!(!store.try_acquire(&key, "b", Duration::from_secs(5)).unwrap());
    assert_eq!(store.current_token(&key).unwrap().as_deref(), Some("a"));

    assert!(!store.try_release(&key, "b").unwrap());
    assert!(store.try_release(&key, "a").unwrap());
    assert!(matches!(
        store.try_release(&key, "a"),
        Err(StoreError::KeyMissing { .. })
    ));
}

#[test]
fn live_refresh_requires_key() {
    let Some(store) = live_store() else {
        eprintln!("Skipping: DLOCK_REDIS_URL not set");
        return;
    };
    let key = unique_key("refresh");

    assert!(matches!(
        store.refresh_expiry(&key, Duration::from_secs(5)),
        Err(StoreError::KeyMissing { .. })
    ));

    store.try_acquire(&key, "a", Duration::from_secs(5)).unwrap();
    store.refresh_expiry(&key, Duration::from_secs(5)).unwrap();
    assert_eq!(store.current_token(&key).unwrap().as_deref(), Some("a"));
    store.try_release(&key, "a").unwrap();
}

#[test]
fn live_oversized_ttl_is_accepted() {
    let Some(store) = live_store() else {
        eprintln!("Skipping: DLOCK_REDIS_URL not set");
        return;
    };
    let key = unique_key("huge-ttl");

    assert!(store.try_acquire(&key, "a", Duration::MAX).unwrap());
    store.refresh_expiry(&key, Duration::MAX).unwrap();
    assert_eq!(store.current_token(&key).unwrap().as_deref(), Some("a"));
    assert!(store.try_release(&key, "a").unwrap());
}
