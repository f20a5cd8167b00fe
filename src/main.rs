// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! NGO Console CLI
//!
//! Logs in to the NGO backend and runs console operations from the
//! command line.

use clap::Parser;
use ngo_console::cli::{self, Cli};
use ngo_console::error::{AppError, Notice};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(app_err) => {
                    tracing::debug!(error = %app_err, "Command failed");
                    match app_err.notice() {
                        Notice::Redirect { to, .. } => {
                            eprintln!("{}", app_err);
                            eprintln!("Run `ngo login` to continue ({}).", to);
                        }
                        _ => eprintln!("{}", app_err.notice_message()),
                    }
                }
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let mut filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .from_env_lossy();
    if std::env::var_os("RUST_LOG").is_none() {
        if let Ok(directive) = "ngo_console=info".parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry().with(filter).with(format).init();
}
