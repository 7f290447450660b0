// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use agent_mgmt_sdk::{AgentId, HeartBeatStatus};

use super::{connect, describe};

#[derive(Subcommand)]
pub enum AgentCommand {
    /// List agents with a recent heartbeat
    Available {
        /// Maximum number of agents (0 = server default)
        #[arg(short, long, default_value_t = 0)]
        limit: i32,
    },

    /// Resolve a phone session reference to its agent
    Resolve {
        /// Session reference
        #[arg(value_name = "REF_ID")]
        ref_id: String,
    },

    /// Record a heartbeat for an agent
    Heartbeat {
        /// Agent ID
        #[arg(value_name = "AGENT_ID")]
        agent_id: i32,
    },
}

pub async fn handle_command(command: AgentCommand, host: &str, port: u16) -> Result<()> {
    let mut client = connect(host, port).await?;

    match command {
        AgentCommand::Available { limit } => match client.get_available_agents(limit).await {
            Ok(ids) if ids.is_empty() => println!("{}", "No agents available.".yellow()),
            Ok(ids) => {
                println!("{}", format!("{} agent(s) available:", ids.len()).bold());
                for id in ids {
                    println!("  {}", id);
                }
            }
            Err(e) => anyhow::bail!("{}", describe(&e)),
        },
        AgentCommand::Resolve { ref_id } => match client.get_agent_id_from_ref(&ref_id).await {
            Ok(agent_id) => println!("{} → agent {}", ref_id, agent_id.to_string().bold()),
            Err(e) => anyhow::bail!("{}", describe(&e)),
        },
        AgentCommand::Heartbeat { agent_id } => {
            match client.heart_beat(AgentId(agent_id)).await {
                Ok(HeartBeatStatus::Successful) => {
                    println!("{}", format!("✓ Heartbeat recorded for agent {}", agent_id).green())
                }
                Ok(HeartBeatStatus::Failed) => {
                    anyhow::bail!("Heartbeat for agent {} reported FAILED", agent_id)
                }
                Err(e) => anyhow::bail!("{}", describe(&e)),
            }
        }
    }

    Ok(())
}
