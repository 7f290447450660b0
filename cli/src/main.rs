// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # agent-mgmt
//!
//! Server and command line client for the agent management service.
//!
//! ## Commands
//!
//! - `agent-mgmt serve` - Run the gRPC server (`--port` overrides spec.server.grpc_port)
//! - `agent-mgmt update [--dry-run]` - Apply database migrations
//! - `agent-mgmt config show|validate|generate` - Configuration management
//! - `agent-mgmt agent available|resolve|heartbeat` - Agent operations against a running server
//! - `agent-mgmt task add` - Create a task against a running server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use agent_mgmt::commands::{self, AgentCommand, ConfigCommand, TaskCommand, UpdateCommand};
use agent_mgmt_core::domain::service_config::ServiceConfigManifest;

const DEFAULT_GRPC_PORT: u16 = 50000;

/// Agent availability, reference resolution and task allocation
#[derive(Parser)]
#[command(name = "agent-mgmt")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "AGENT_MGMT_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Server host for client commands
    #[arg(long, global = true, env = "AGENT_MGMT_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server gRPC port: the target of client commands, the listen port for serve
    #[arg(long, global = true, env = "AGENT_MGMT_GRPC_PORT", value_name = "PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error); defaults to spec.logging.level
    #[arg(long, global = true, env = "AGENT_MGMT_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gRPC server
    #[command(name = "serve")]
    Serve,

    /// Agent operations
    #[command(name = "agent")]
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },

    /// Task operations
    #[command(name = "task")]
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Update the database schema
    #[command(name = "update")]
    Update {
        #[command(flatten)]
        command: UpdateCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = match &cli.log_level {
        Some(level) => level.clone(),
        None => ServiceConfigManifest::load_or_default(cli.config.clone())
            .map(|c| c.spec.logging.level)
            .unwrap_or_else(|_| "info".to_string()),
    };
    init_logging(&level)?;

    let client_port = cli.port.unwrap_or(DEFAULT_GRPC_PORT);

    match cli.command {
        Some(Commands::Serve) => commands::serve::execute(cli.config, cli.port).await,
        Some(Commands::Agent { command }) => {
            commands::agent::handle_command(command, &cli.host, client_port).await
        }
        Some(Commands::Task { command }) => {
            commands::task::handle_command(command, &cli.host, client_port).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Update { command }) => commands::update::execute(command, cli.config).await,
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
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
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
