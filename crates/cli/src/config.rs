// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional TOML configuration file
//!
//! ```toml
//! [store]
//! url = "redis://127.0.0.1:6379/"
//!
//! [lock]
//! key = "deploy"
//! expiry = "30s"
//! wait_interval = "30ms"
//! ```
//!
//! Command-line flags take precedence over file values.

use anyhow::{Context, Result};
use dlock_core::LockConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub store: StoreSection,
    pub lock: LockSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockSection {
    pub key: Option<String>,
    #[serde(with = "humantime_serde")]
    pub expiry: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub wait_interval: Option<Duration>,
}

/// Per-invocation overrides from the command line
#[derive(Debug, Default)]
pub struct LockOverrides {
    pub key: Option<String>,
    pub expiry: Option<Duration>,
    pub wait_interval: Option<Duration>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge flags over file values into a validated lock configuration.
    ///
    /// `fallback_key` is used when neither names a key.
    pub fn lock_config(
        &self,
        overrides: LockOverrides,
        fallback_key: Option<&str>,
    ) -> Result<LockConfig> {
        let key = overrides
            .key
            .or_else(|| self.lock.key.clone())
            .or_else(|| fallback_key.map(str::to_string))
            .context("no lock key: pass --key or set [lock] key in the config file")?;

        let mut config = LockConfig::new(key);
        if let Some(expiry) = overrides.expiry.or(self.lock.expiry) {
            config = config.with_expiry(expiry);
        }
        if let Some(interval) = overrides.wait_interval.or(self.lock.wait_interval) {
            config = config.with_wait_interval(interval);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
