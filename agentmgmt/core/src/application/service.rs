// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agent Management Service
//!
//! The four business operations exposed over gRPC. `StandardAgentMgmtService`
//! composes the directory, resolver and task allocator and is where storage
//! outcomes become typed errors. Logging and metrics are layered on by the
//! decorators in [`crate::application::middleware`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::agent_directory::AgentDirectory;
use crate::application::reference_resolver::ReferenceResolver;
use crate::application::task_allocator::TaskAllocator;
use crate::domain::agent::AgentId;
use crate::domain::clock::Clock;
use crate::domain::errors::{AgentMgmtError, ServiceError};
use crate::domain::task::{CustId, TaskId};

/// Outcome of a heartbeat. Every `Err` returned by
/// [`AgentMgmtService::heart_beat`] corresponds to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeartBeatStatus {
    Successful,
    Failed,
}

impl HeartBeatStatus {
    pub fn of<E>(result: &Result<HeartBeatStatus, E>) -> Self {
        match result {
            Ok(status) => *status,
            Err(_) => HeartBeatStatus::Failed,
        }
    }
}

impl fmt::Display for HeartBeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeartBeatStatus::Successful => f.write_str("SUCCESSFUL"),
            HeartBeatStatus::Failed => f.write_str("FAILED"),
        }
    }
}

#[async_trait]
pub trait AgentMgmtService: Send + Sync {
    /// Decimal ids of agents with a heartbeat inside the availability
    /// window, in insertion order. `limit <= 0` selects the default cap.
    async fn get_available_agents(&self, limit: i32) -> Result<Vec<String>, ServiceError>;

    async fn get_agent_id_from_ref(&self, ref_id: &str) -> Result<AgentId, ServiceError>;

    async fn heart_beat(&self, agent_id: AgentId) -> Result<HeartBeatStatus, ServiceError>;

    async fn add_task(&self, cust_id: CustId, agent_ids: Vec<AgentId>) -> Result<TaskId, ServiceError>;
}

pub struct StandardAgentMgmtService {
    directory: Arc<AgentDirectory>,
    resolver: Arc<ReferenceResolver>,
    tasks: Arc<TaskAllocator>,
    clock: Arc<dyn Clock>,
}

impl StandardAgentMgmtService {
    pub fn new(
        directory: Arc<AgentDirectory>,
        resolver: Arc<ReferenceResolver>,
        tasks: Arc<TaskAllocator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            resolver,
            tasks,
            clock,
        }
    }
}

#[async_trait]
impl AgentMgmtService for StandardAgentMgmtService {
    async fn get_available_agents(&self, limit: i32) -> Result<Vec<String>, ServiceError> {
        let since = self.directory.window().since(self.clock.now());
        debug!(since = %since, limit, "Listing available agents");

        let agents = self.directory.list_available(since, limit).await?;
        Ok(agents.iter().map(|a| a.agent_id.to_string()).collect())
    }

    async fn get_agent_id_from_ref(&self, ref_id: &str) -> Result<AgentId, ServiceError> {
        match self.resolver.agent_id_from_ref(ref_id).await? {
            Some(agent_id) if agent_id.is_valid() => Ok(agent_id),
            _ => {
                warn!(ref_id, "No agent bound to reference");
                Err(AgentMgmtError::agent_id_not_found(format!(
                    "no agent id for reference '{}'",
                    ref_id
                ))
                .into())
            }
        }
    }

    async fn heart_beat(&self, agent_id: AgentId) -> Result<HeartBeatStatus, ServiceError> {
        self.directory.agent_exists(agent_id).await?;
        self.directory.heartbeat(agent_id).await?;
        Ok(HeartBeatStatus::Successful)
    }

    async fn add_task(&self, cust_id: CustId, agent_ids: Vec<AgentId>) -> Result<TaskId, ServiceError> {
        self.tasks.add_task(cust_id, agent_ids).await
    }
}
