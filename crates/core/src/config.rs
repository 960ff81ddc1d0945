// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock configuration
//!
//! ```toml
//! key = "jobs:nightly"
//! expiry = "30s"
//! wait_interval = "30ms"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default time-to-live of a store entry
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(30);

/// Default pause between contended acquisition attempts
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_millis(30);

/// Errors from loading a lock configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lock config: {0}")]
    Invalid(String),
}

/// Settings for one distributed lock
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Store key identifying the shared resource
    pub key: String,
    /// Time-to-live applied to the store entry
    #[serde(with = "humantime_serde", default = "default_expiry")]
    pub expiry: Duration,
    /// Delay between failed attempts in blocking acquisition
    #[serde(with = "humantime_serde", default = "default_wait_interval")]
    pub wait_interval: Duration,
}

fn default_expiry() -> Duration {
    DEFAULT_EXPIRY
}

fn default_wait_interval() -> Duration {
    DEFAULT_WAIT_INTERVAL
}

impl LockConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expiry: DEFAULT_EXPIRY,
            wait_interval: DEFAULT_WAIT_INTERVAL,
        }
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn with_wait_interval(mut self, interval: Duration) -> Self {
        self.wait_interval = interval;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: LockConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key.is_empty() {
            return Err(ConfigError::Invalid("key must not be empty".to_string()));
        }
        if self.expiry.is_zero() {
            return Err(ConfigError::Invalid("expiry must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
