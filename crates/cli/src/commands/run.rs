// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlock run --key K -- <command>` - Run a command while holding a lock

use anyhow::{Context, Result};
use clap::Args;
use dlock_core::{DistributedLock, DistributedMutex, Interrupt, LockConfig, LockError, LockStore};
use std::process::{Command, ExitCode, ExitStatus};
use std::time::Duration;

use crate::config::{FileConfig, LockOverrides};

/// Exit code when `--timeout` elapses without the lock
pub const NOT_ACQUIRED: u8 = 2;

/// Exit code when Ctrl-C cancels the wait
pub const INTERRUPTED: u8 = 130;

#[derive(Args)]
pub struct RunArgs {
    /// Lock key
    #[arg(long)]
    pub key: Option<String>,

    /// Expiry of the store entry (e.g. "30s")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub ttl: Option<Duration>,

    /// Delay between acquisition attempts (e.g. "30ms")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub wait: Option<Duration>,

    /// Make one attempt within this budget instead of waiting indefinitely
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Command to run while the lock is held
    #[arg(trailing_var_arg = true, required = true, num_args = 1..)]
    pub command: Vec<String>,
}

pub fn run(args: RunArgs, file: &FileConfig, redis: Option<&str>) -> Result<ExitCode> {
    let url = super::require_redis(redis)?;
    let config = file.lock_config(
        LockOverrides {
            key: args.key.clone(),
            expiry: args.ttl,
            wait_interval: args.wait,
        },
        None,
    )?;
    let store = super::open_redis(url)?;

    let interrupt = Interrupt::new();
    let handle = interrupt.clone();
    ctrlc::set_handler(move || handle.interrupt()).context("failed to install Ctrl-C handler")?;

    run_locked(store, config, args.timeout, &args.command, &interrupt)
}

/// Acquire, run `command`, release.
///
/// The child's exit code becomes ours. Losing the lock while the child ran
/// is reported as an error after the child finishes.
pub fn run_locked<S: LockStore>(
    store: S,
    config: LockConfig,
    timeout: Option<Duration>,
    command: &[String],
    interrupt: &Interrupt,
) -> Result<ExitCode> {
    let Some((program, rest)) = command.split_first() else {
        anyhow::bail!("no command given");
    };
    let key = config.key.clone();
    let mutex = DistributedMutex::new(store, config);

    match timeout {
        Some(budget) => {
            if !mutex.try_lock_for(budget) {
                eprintln!(
                    "lock {key} not acquired within {}",
                    humantime::format_duration(budget)
                );
                return Ok(ExitCode::from(NOT_ACQUIRED));
            }
        }
        None => match mutex.lock_interruptibly(interrupt) {
            Ok(()) => {}
            Err(LockError::Interrupted) => {
                eprintln!("interrupted while waiting for {key}");
                return Ok(ExitCode::from(INTERRUPTED));
            }
            Err(e) => return Err(e).with_context(|| format!("failed to lock {key}")),
        },
    }
    tracing::info!(key, token = ?mutex.token(), "lock acquired");

    let status = Command::new(program).args(rest).status();
    let released = mutex.unlock();

    let status = status.with_context(|| format!("failed to run {program}"))?;
    released.with_context(|| format!("failed to unlock {key}"))?;
    Ok(exit_code(status))
}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
