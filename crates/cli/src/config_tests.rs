// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

#[test]
fn empty_file_uses_defaults() {
    let file = FileConfig::parse("").unwrap();
    assert!(file.store.url.is_none());

    let config = file
        .lock_config(LockOverrides::default(), Some("demo"))
        .unwrap();
    assert_eq!(config.key, "demo");
    assert_eq!(config.expiry, dlock_core::DEFAULT_EXPIRY);
    assert_eq!(config.wait_interval, dlock_core::DEFAULT_WAIT_INTERVAL);
}

#[test]
fn parses_all_sections() {
    let file = FileConfig::parse(
        r#"
[store]
url = "redis://cache:6379/"

[lock]
key = "deploy"
expiry = "10s"
wait_interval = "5ms"
"#,
    )
    .unwrap();

    assert_eq!(file.store.url.as_deref(), Some("redis://cache:6379/"));
    let config = file.lock_config(LockOverrides::default(), None).unwrap();
    assert_eq!(config.key, "deploy");
    assert_eq!(config.expiry, Duration::from_secs(10));
    assert_eq!(config.wait_interval, Duration::from_millis(5));
}

#[test]
fn flags_override_file_values() {
    let file = FileConfig::parse("[lock]\nkey = \"deploy\"\nexpiry = \"10s\"\n").unwrap();

    let config = file
        .lock_config(
            LockOverrides {
                key: Some("backup".to_string()),
                expiry: Some(Duration::from_secs(2)),
                wait_interval: None,
            },
            None,
        )
        .unwrap();

    assert_eq!(config.key, "backup");
    assert_eq!(config.expiry, Duration::from_secs(2));
}

#[test]
fn missing_key_is_an_error() {
    let file = FileConfig::default();
    let err = file
        .lock_config(LockOverrides::default(), None)
        .unwrap_err();
    assert!(err.to_string().contains("--key"), "{err}");
}

#[test]
fn zero_expiry_is_rejected() {
    let file = FileConfig::default();
    let result = file.lock_config(
        LockOverrides {
            key: Some("k".to_string()),
            expiry: Some(Duration::ZERO),
            wait_interval: None,
        },
        None,
    );
    assert!(result.is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(FileConfig::parse("[lock]\nttl = \"1s\"\n").is_err());
}

#[test]
fn load_reports_path_on_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[lock]\nexpiry = \"soon\"").unwrap();

    let err = FileConfig::load(file.path()).unwrap_err();
    assert!(
        err.to_string().contains(&file.path().display().to_string()),
        "{err}"
    );
}
