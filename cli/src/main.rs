// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! # Ernest CLI
//!
//! The `ernest` binary drives an Ernest orchestration server over HTTP.
//!
//! ## Commands
//!
//! - `ernest target|info|login|logout` - Session management
//! - `ernest service list|info|builds|build|destroy|reset` - Service operations
//! - `ernest monitor <service>` - Follow a build until it finishes
//! - `ernest datacenter|user|group list`, `ernest user create` - Administration
//! - `ernest preferences logger list|add|delete` - Logger preferences

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use ernest_cli::commands::{self, Command};
use ernest_cli::error::exit_code;

/// Ernest command line client
#[derive(Parser)]
#[command(name = "ernest")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (default: ~/.ernest/config.yaml)
    #[arg(
        short,
        long,
        global = true,
        env = "ERNEST_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Server URL for this invocation (overrides the stored target)
    #[arg(long = "url", global = true, env = "ERNEST_URL", value_name = "URL")]
    server_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(
        long,
        global = true,
        env = "ERNEST_TIMEOUT",
        default_value = "30",
        value_name = "SECONDS"
    )]
    request_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "ERNEST_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.log_level) {
        eprintln!("{}", format!("{:#}", err).red());
        std::process::exit(1);
    }

    if let Err(err) = run(cli).await {
        eprintln!("{}", format!("{:#}", err).red());
        std::process::exit(exit_code(&err));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let timeout = (cli.request_timeout > 0).then(|| Duration::from_secs(cli.request_timeout));
    let ctx = commands::Context::load(cli.config, cli.server_url, timeout)?;
    debug!("Using config at {:?}", ctx.config_path);

    commands::dispatch(cli.command, ctx).await
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
