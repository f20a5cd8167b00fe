// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command-line console over the client library.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::api::NgoApi;
use crate::config::Config;
use crate::db::SessionStore;

#[derive(Parser)]
#[command(name = "ngo")]
#[command(about = "NGO admin console - manage members, donations, mail and problem reports")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Log in and store the session")]
    Login {
        #[arg(help = "Email address or phone number")]
        email_or_phone: String,
        #[arg(long, help = "Role to log in as (admin, district-admin, region-admin, member)")]
        role: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Destroy the stored session")]
    Logout,

    #[command(about = "Show the current session")]
    Whoami,

    #[command(about = "Refresh the access token now")]
    Refresh,

    #[command(about = "List members visible to the current role")]
    Members {
        #[arg(long, help = "Only members of this district (server-side)")]
        district: Option<String>,
    },

    #[command(about = "Member and donation counts")]
    Dashboard,

    #[command(about = "Citizen problem reports")]
    Problems {
        #[command(subcommand)]
        cmd: commands::ProblemCommands,
    },

    #[command(about = "Broadcast mail")]
    Mail {
        #[command(subcommand)]
        cmd: commands::MailCommands,
    },

    #[command(about = "Accepted public testimonials")]
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json && !cli.text {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = Config::from_env()?;
    tracing::debug!(base_url = %config.api_base_url, "Loaded configuration");

    let api = NgoApi::connect(&config, SessionStore::file(&config.session_file)).await?;
    commands::handle(&api, cli.command, output_format).await
}
