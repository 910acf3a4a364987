// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod admin;
mod cli;
mod config;
mod error;
mod protocol;
mod serve;

#[cfg(test)]
mod tests;

use chrono::Utc;
use clap::Parser;
use cli::{Args, Commands};
use cocolu_persistence::SnapshotStore;
use config::{ServiceConfig, open_store};
use error::ServiceError;
use serde_json::Value;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout carries protocol and command output only.
fn init_tracing(level: Option<&str>) -> Result<(), ServiceError> {
    let filter: EnvFilter = match level {
        Some(level) => EnvFilter::try_new(level).map_err(|e| ServiceError::LogFilter {
            level: level.to_string(),
            reason: e.to_string(),
        })?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run(args: Args) -> Result<(), ServiceError> {
    let config: ServiceConfig = ServiceConfig::from_args(&args)?;
    let store: Arc<dyn SnapshotStore> = open_store(&args)?;

    match args.command.unwrap_or(Commands::Run) {
        Commands::Run => serve::serve(config, store).await,
        subcommand => {
            let output: Value =
                admin::run_admin(subcommand, &config, store.as_ref(), Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Args = Args::parse();

    if let Err(err) = init_tracing(args.log_level.as_deref()) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Service failed");
            ExitCode::FAILURE
        }
    }
}
