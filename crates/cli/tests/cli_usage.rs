// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI usage tests
//!
//! These tests need no store: they cover help output and configuration errors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use common::{config_file, dlock};
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    dlock()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("contend"));
}

#[test]
fn version_is_printed() {
    dlock()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dlock "));
}

#[test]
fn status_without_store_fails() {
    dlock()
        .args(["status", "--key", "jobs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no store configured"));
}

#[test]
fn run_without_store_fails_before_running() {
    dlock()
        .args(["run", "--key", "jobs", "--", "sh", "-c", "echo ran"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ran").not())
        .stderr(predicate::str::contains("no store configured"));
}

#[test]
fn run_requires_a_command() {
    dlock()
        .args(["--redis", "redis://127.0.0.1:1/", "run", "--key", "jobs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn invalid_duration_is_rejected() {
    dlock()
        .args(["contend", "--dwell", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dwell"));
}

#[test]
fn unreadable_config_is_reported() {
    dlock()
        .args(["--config", "/nonexistent/dlock.toml", "contend"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/dlock.toml"));
}

#[test]
fn zero_expiry_in_config_is_rejected() {
    let config = config_file("[lock]\nkey = \"jobs\"\nexpiry = \"0s\"\n");

    dlock()
        .arg("--config")
        .arg(config.path())
        .args(["contend", "--visits", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expiry"));
}

#[test]
fn unreachable_store_is_a_transport_error() {
    dlock()
        .args(["--redis", "redis://127.0.0.1:1/", "status", "--key", "jobs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
