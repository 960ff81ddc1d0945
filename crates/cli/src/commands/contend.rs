// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlock contend` - Several threads bump a shared counter through one lock
//!
//! Every visit reads the counter, dwells, and writes it back plus one. With a
//! working lock the final count equals the number of visits.

use anyhow::Result;
use clap::Args;
use dlock_core::{
    DistributedLock, DistributedMutex, LockConfig, LockStore, MemoryStore, NoopLock,
    ReentrantDistributedMutex,
};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::config::{FileConfig, LockOverrides};
use crate::output::{self, OutputFormat};

const DEFAULT_KEY: &str = "dlock:contend";

#[derive(Args)]
pub struct ContendArgs {
    /// Lock key
    #[arg(long)]
    pub key: Option<String>,

    /// Worker threads
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Total visits across all threads
    #[arg(long, default_value_t = 20)]
    pub visits: u64,

    /// Time spent between reading and writing the counter
    #[arg(long, default_value = "1ms", value_parser = humantime::parse_duration)]
    pub dwell: Duration,

    /// Use the reentrant mutex, locking twice per visit
    #[arg(long, conflicts_with = "unlocked")]
    pub reentrant: bool,

    /// Poll with try_lock instead of blocking in lock
    #[arg(long, conflicts_with = "unlocked")]
    pub try_lock: bool,

    /// Skip locking entirely to show lost updates
    #[arg(long)]
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Mutex,
    Reentrant,
    Unlocked,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Mutex => write!(f, "mutex"),
            Mode::Reentrant => write!(f, "reentrant"),
            Mode::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// Workload shape shared by every mode
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub threads: u32,
    pub visits: u64,
    pub dwell: Duration,
    pub try_lock: bool,
    /// Sleep between failed try_lock polls
    pub poll: Duration,
}

#[derive(Debug, Serialize)]
pub struct ContendReport {
    pub mode: Mode,
    pub threads: u32,
    pub visits: u64,
    pub count: u64,
}

impl fmt::Display for ContendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mode: {}", self.mode)?;
        writeln!(f, "threads: {}", self.threads)?;
        writeln!(f, "visits: {}", self.visits)?;
        write!(f, "count: {}", self.count)
    }
}

pub fn contend(
    args: ContendArgs,
    file: &FileConfig,
    redis: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let config = file.lock_config(
        LockOverrides {
            key: args.key.clone(),
            ..LockOverrides::default()
        },
        Some(DEFAULT_KEY),
    )?;
    let mode = if args.unlocked {
        Mode::Unlocked
    } else if args.reentrant {
        Mode::Reentrant
    } else {
        Mode::Mutex
    };
    let workload = Workload {
        threads: args.threads,
        visits: args.visits,
        dwell: args.dwell,
        try_lock: args.try_lock,
        poll: config.wait_interval,
    };

    let report = match redis {
        Some(url) => execute(super::open_redis(url)?, config, mode, workload)?,
        None => execute(MemoryStore::new(), config, mode, workload)?,
    };
    output::print(&report, format);
    Ok(())
}

pub fn execute<S: LockStore>(
    store: S,
    config: LockConfig,
    mode: Mode,
    workload: Workload,
) -> Result<ContendReport> {
    tracing::info!(key = %config.key, %mode, threads = workload.threads, visits = workload.visits, "contending");

    let count = match mode {
        Mode::Mutex => visit_all(&DistributedMutex::new(store, config), workload, 1)?,
        Mode::Reentrant => {
            visit_all(&ReentrantDistributedMutex::new(store, config), workload, 2)?
        }
        Mode::Unlocked => visit_all(&NoopLock::new(config.key), workload, 1)?,
    };

    Ok(ContendReport {
        mode,
        threads: workload.threads,
        visits: workload.visits,
        count,
    })
}

/// Run every visit, acquiring `depth` nested holds per visit
fn visit_all<L: DistributedLock>(lock: &L, workload: Workload, depth: u32) -> Result<u64> {
    let counter = AtomicU64::new(0);
    let next = AtomicUsize::new(0);
    let total = usize::try_from(workload.visits)?;

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..workload.threads)
            .map(|_| {
                scope.spawn(|| -> Result<()> {
                    while next.fetch_add(1, Ordering::Relaxed) < total {
                        for _ in 0..depth {
                            acquire(lock, workload)?;
                        }

                        let seen = counter.load(Ordering::SeqCst);
                        std::thread::sleep(workload.dwell);
                        counter.store(seen + 1, Ordering::SeqCst);

                        for _ in 0..depth {
                            lock.unlock()?;
                        }
                    }
                    Ok(())
                })
            })
            .collect();

        for worker in workers {
            match worker.join() {
                Ok(result) => result?,
                Err(_) => anyhow::bail!("contend worker panicked"),
            }
        }
        Ok(())
    })?;

    Ok(counter.load(Ordering::SeqCst))
}

fn acquire<L: DistributedLock>(lock: &L, workload: Workload) -> Result<()> {
    if !workload.try_lock {
        return Ok(lock.lock()?);
    }
    while !lock.try_lock() {
        std::thread::sleep(workload.poll);
    }
    Ok(())
}

#[cfg(test)]
#[path = "contend_tests.rs"]
mod tests;
