// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use agent_mgmt_sdk::{AgentId, CustId};

use super::{connect, describe};

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Create a task for a customer
    Add {
        /// Customer ID (must be positive)
        #[arg(value_name = "CUST_ID", allow_negative_numbers = true)]
        cust_id: i32,

        /// Agents to offer the task to, in order
        #[arg(value_name = "AGENT_IDS")]
        agent_ids: Vec<i32>,
    },
}

pub async fn handle_command(command: TaskCommand, host: &str, port: u16) -> Result<()> {
    let mut client = connect(host, port).await?;

    match command {
        TaskCommand::Add { cust_id, agent_ids } => {
            let agent_ids: Vec<AgentId> = agent_ids.into_iter().map(AgentId).collect();
            match client.add_task(CustId(cust_id), &agent_ids).await {
                Ok(task_id) => {
                    println!("{}", format!("✓ Task {} created", task_id).green())
                }
                Err(e) => anyhow::bail!("{}", describe(&e)),
            }
        }
    }

    Ok(())
}
