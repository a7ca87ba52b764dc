// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quill: headless signer.
//
// Entry point. Initialises logging, loads the editor configuration, and
// dispatches to the requested subcommand.

mod cli;
mod config;
mod flatten;
mod typed;

use std::process::ExitCode;

use clap::Parser;
use quill_core::human_errors::humanize_error;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Quill starting");

    let outcome = match config::load_config(cli.config.as_deref()) {
        Ok(config) => match &cli.command {
            Command::Flatten(args) => flatten::run(args, &config).await,
            Command::Type(args) => typed::run(args, &config),
        },
        Err(e) => Err(e),
    };

    match outcome {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            let notice = humanize_error(&e);
            eprintln!("error: {}", notice.message);
            eprintln!("  {}", notice.suggestion);
            ExitCode::FAILURE
        }
    }
}
