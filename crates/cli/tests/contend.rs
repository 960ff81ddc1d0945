// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI tests for `dlock contend` over the in-memory store

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use common::{config_file, dlock};
use predicates::prelude::*;

fn count_from(stdout: &[u8]) -> u64 {
    let text = String::from_utf8_lossy(stdout);
    text.lines()
        .find_map(|line| line.strip_prefix("count: "))
        .expect("count line")
        .parse()
        .unwrap()
}

#[test]
fn mutex_counts_every_visit() {
    dlock()
        .args(["contend", "--threads", "4", "--visits", "16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode: mutex"))
        .stdout(predicate::str::contains("count: 16"));
}

#[test]
fn reentrant_counts_every_visit() {
    dlock()
        .args(["contend", "--reentrant", "--threads", "3", "--visits", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode: reentrant"))
        .stdout(predicate::str::contains("count: 9"));
}

#[test]
fn try_lock_polling_counts_every_visit() {
    dlock()
        .args(["contend", "--try-lock", "--threads", "3", "--visits", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("count: 9"));
}

#[test]
fn unlocked_baseline_loses_updates() {
    let output = dlock()
        .args([
            "contend",
            "--unlocked",
            "--threads",
            "4",
            "--visits",
            "4",
            "--dwell",
            "200ms",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(count_from(&output.stdout) < 4);
}

#[test]
fn unlocked_conflicts_with_reentrant() {
    dlock()
        .args(["contend", "--unlocked", "--reentrant"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn json_output_is_structured() {
    let output = dlock()
        .args(["--format", "json", "contend", "--threads", "2", "--visits", "4"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mode"], "mutex");
    assert_eq!(report["visits"], 4);
    assert_eq!(report["count"], 4);
}

#[test]
fn config_file_supplies_lock_settings() {
    let config = config_file("[lock]\nkey = \"from-file\"\nwait_interval = \"1ms\"\n");

    dlock()
        .arg("--config")
        .arg(config.path())
        .args(["contend", "--try-lock", "--visits", "6"])
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stdout(predicate::str::contains("count: 6"))
        .stderr(predicate::str::contains("from-file"));
}
