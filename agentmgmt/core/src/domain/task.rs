// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::agent::AgentId;

/// Counter that mints task identifiers.
pub const TASK_ID_COUNTER: &str = "taskid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub i32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustId(pub i32);

impl CustId {
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for CustId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of call work. Immutable once persisted.
///
/// `agent_ids` keeps the caller's order and duplicates, and is not checked
/// against the agent directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub cust_id: CustId,
    pub agent_ids: Vec<AgentId>,
    pub added_at: DateTime<Utc>,
}
