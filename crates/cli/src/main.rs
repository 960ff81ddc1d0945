// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dlock - distributed mutex CLI

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{contend, run, status};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::FileConfig;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "dlock",
    version,
    about = "dlock - Mutual exclusion over a shared key-value store"
)]
struct Cli {
    /// Redis server URL
    #[arg(long, global = true, env = "DLOCK_REDIS_URL")]
    redis: Option<String>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command while holding a lock
    Run(run::RunArgs),
    /// Show who holds a lock key
    Status(status::StatusArgs),
    /// Hammer a shared counter from several threads
    Contend(contend::ContendArgs),
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let redis = cli.redis.or_else(|| file.store.url.clone());

    match cli.command {
        Commands::Run(args) => run::run(args, &file, redis.as_deref()),
        Commands::Status(args) => {
            status::status(args, &file, redis.as_deref(), cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Contend(args) => {
            contend::contend(args, &file, redis.as_deref(), cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
