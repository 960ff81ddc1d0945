// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dlock_core::MemoryStore;

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

#[test]
fn runs_command_and_releases_lock() {
    let store = MemoryStore::new();
    let code = run_locked(
        store.clone(),
        LockConfig::new("job"),
        None,
        &sh("exit 0"),
        &Interrupt::new(),
    )
    .unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(store.is_empty());
}

#[test]
fn propagates_child_exit_code() {
    let code = run_locked(
        MemoryStore::new(),
        LockConfig::new("job"),
        None,
        &sh("exit 7"),
        &Interrupt::new(),
    )
    .unwrap();

    assert_eq!(code, ExitCode::from(7));
}

#[test]
fn timeout_on_busy_key_does_not_run_command() {
    let store = MemoryStore::new();
    store.overwrite("job", "someone-else", Duration::from_secs(30));
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");

    let code = run_locked(
        store.clone(),
        LockConfig::new("job"),
        Some(Duration::from_millis(20)),
        &sh(&format!("touch {}", marker.display())),
        &Interrupt::new(),
    )
    .unwrap();

    assert_eq!(code, ExitCode::from(NOT_ACQUIRED));
    assert!(!marker.exists());
    assert_eq!(
        store.current_token("job").unwrap().as_deref(),
        Some("someone-else")
    );
}

#[test]
fn interrupted_wait_exits_without_running() {
    let store = MemoryStore::new();
    store.overwrite("job", "someone-else", Duration::from_secs(30));
    let interrupt = Interrupt::new();
    interrupt.interrupt();

    let code = run_locked(
        store,
        LockConfig::new("job"),
        None,
        &sh("exit 0"),
        &interrupt,
    )
    .unwrap();

    assert_eq!(code, ExitCode::from(INTERRUPTED));
}

#[test]
fn missing_program_is_an_error_and_still_releases() {
    let store = MemoryStore::new();
    let result = run_locked(
        store.clone(),
        LockConfig::new("job"),
        None,
        &["dlock-definitely-not-a-program".to_string()],
        &Interrupt::new(),
    );

    assert!(result.is_err());
    assert!(store.is_empty());
}
