// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Task Allocator
//!
//! Creates call tasks. The customer id is validated before anything else
//! runs, so a rejected request never consumes a task id.

use std::sync::Arc;
use tracing::info;

use crate::application::sequence::SequenceAllocator;
use crate::domain::agent::AgentId;
use crate::domain::clock::Clock;
use crate::domain::errors::{AgentMgmtError, ServiceError};
use crate::domain::repository::TaskRepository;
use crate::domain::task::{CustId, Task, TaskId, TASK_ID_COUNTER};

pub struct TaskAllocator {
    tasks: Arc<dyn TaskRepository>,
    sequence: Arc<SequenceAllocator>,
    clock: Arc<dyn Clock>,
}

impl TaskAllocator {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        sequence: Arc<SequenceAllocator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            sequence,
            clock,
        }
    }

    pub async fn add_task(
        &self,
        cust_id: CustId,
        agent_ids: Vec<AgentId>,
    ) -> Result<TaskId, ServiceError> {
        if !cust_id.is_valid() {
            return Err(AgentMgmtError::cust_id_invalid(format!(
                "customer id must be positive, got {}",
                cust_id
            ))
            .into());
        }

        let task_id = TaskId(self.sequence.next_sequence(TASK_ID_COUNTER).await?);
        let task = Task {
            task_id,
            cust_id,
            agent_ids,
            added_at: self.clock.now(),
        };
        self.tasks.insert(&task).await?;

        info!(
            task_id = %task.task_id,
            cust_id = %task.cust_id,
            agents = task.agent_ids.len(),
            "Task added"
        );
        Ok(task_id)
    }
}
