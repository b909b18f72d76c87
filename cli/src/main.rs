// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # prequest
//!
//! Submit a synthesized HTTP request to an application described by a YAML
//! config file and print the response.
//!
//! ```text
//! prequest config.yaml /path [key=value ...] [--method=post] [--header name:value] [-d]
//! ```
//!
//! Exit status: `0` on success, `2` on usage errors, `1` when the
//! application cannot be loaded or invoked.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use aegis_guard_cli::commands::{PRequestArgs, PRequestCommand};

#[tokio::main]
async fn main() -> ExitCode {
    let args = PRequestArgs::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        return ExitCode::FAILURE;
    }

    let mut stdout = std::io::stdout().lock();
    match PRequestCommand::new(args).run(&mut stdout).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
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
