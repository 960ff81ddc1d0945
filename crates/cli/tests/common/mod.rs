// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for dlock CLI tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;

/// `dlock` with the ambient environment scrubbed
pub fn dlock() -> Command {
    let mut cmd = Command::cargo_bin("dlock").unwrap();
    cmd.env_remove("DLOCK_REDIS_URL").env_remove("RUST_LOG");
    cmd
}

/// Redis URL for live tests, if one is configured
pub fn redis_url() -> Option<String> {
    std::env::var("DLOCK_REDIS_URL").ok()
}

/// Write a config file that lives as long as the returned handle
pub fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Key unique to this test process
pub fn unique_key(name: &str) -> String {
    format!("dlock-test:{}:{}", name, std::process::id())
}
