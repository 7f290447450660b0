// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use crate::domain::agent::AgentId;
use crate::domain::errors::ServiceError;
use crate::domain::repository::PhoneSessionRepository;

/// Maps a telephony reference to the agent bound to it.
pub struct ReferenceResolver {
    sessions: Arc<dyn PhoneSessionRepository>,
}

impl ReferenceResolver {
    pub fn new(sessions: Arc<dyn PhoneSessionRepository>) -> Self {
        Self { sessions }
    }

    /// `None` when no session carries `ref_id`. Turning that into an error
    /// is left to the caller.
    pub async fn agent_id_from_ref(&self, ref_id: &str) -> Result<Option<AgentId>, ServiceError> {
        Ok(self.sessions.find_agent_id_by_ref(ref_id).await?)
    }
}
