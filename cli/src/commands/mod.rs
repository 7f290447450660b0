// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the agent-mgmt CLI

pub mod agent;
pub mod config;
pub mod serve;
pub mod task;
pub mod update;

pub use self::agent::AgentCommand;
pub use self::config::ConfigCommand;
pub use self::task::TaskCommand;
pub use self::update::UpdateCommand;

use agent_mgmt_sdk::{AgentMgmtClient, ClientError};
use anyhow::{Context, Result};

/// Connects the SDK client to `host:port`.
pub async fn connect(host: &str, port: u16) -> Result<AgentMgmtClient> {
    let endpoint = format!("http://{}:{}", host, port);
    AgentMgmtClient::connect(endpoint.clone())
        .await
        .with_context(|| format!("Failed to connect to agent management service at {}", endpoint))
}

/// One-line rendering of a failed call, naming the typed kind when present.
pub fn describe(err: &ClientError) -> String {
    match err {
        ClientError::Service(e) => format!("{}: {}", e.kind(), e.detail()),
        ClientError::Transport(status) => {
            format!("transport error ({:?}): {}", status.code(), status.message())
        }
    }
}
