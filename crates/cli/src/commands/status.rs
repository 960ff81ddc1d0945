// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlock status --key K` - Show who holds a lock key

use anyhow::Result;
use clap::Args;
use dlock_core::LockStore;
use serde::Serialize;
use std::fmt;

use crate::config::{FileConfig, LockOverrides};
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct StatusArgs {
    /// Lock key
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LockStatus {
    pub key: String,
    pub token: Option<String>,
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{}: held by {}", self.key, token),
            None => write!(f, "{}: free", self.key),
        }
    }
}

pub fn status(
    args: StatusArgs,
    file: &FileConfig,
    redis: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let url = super::require_redis(redis)?;
    let config = file.lock_config(
        LockOverrides {
            key: args.key,
            ..LockOverrides::default()
        },
        None,
    )?;
    let store = super::open_redis(url)?;

    output::print(&inspect(&store, &config.key)?, format);
    Ok(())
}

pub fn inspect<S: LockStore>(store: &S, key: &str) -> Result<LockStatus> {
    Ok(LockStatus {
        key: key.to_string(),
        token: store.current_token(key)?,
    })
}
