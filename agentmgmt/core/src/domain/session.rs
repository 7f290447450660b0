// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

use crate::domain::agent::AgentId;

/// Binding between a telephony reference and the agent handling it.
/// Written by call ingestion, read here only to resolve references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneSession {
    pub sess_id: i32,
    pub agent_id: AgentId,
    pub ref_id: String,
}

impl PhoneSession {
    pub fn new(sess_id: i32, agent_id: impl Into<AgentId>, ref_id: impl Into<String>) -> Self {
        Self {
            sess_id,
            agent_id: agent_id.into(),
            ref_id: ref_id.into(),
        }
    }
}
