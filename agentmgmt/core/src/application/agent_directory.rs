// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::domain::agent::{Agent, AgentId, AvailabilityWindow};
use crate::domain::clock::Clock;
use crate::domain::errors::{AgentMgmtError, ServiceError};
use crate::domain::repository::AgentRepository;

/// Reads and touches agent records. Never creates or removes them.
pub struct AgentDirectory {
    agents: Arc<dyn AgentRepository>,
    clock: Arc<dyn Clock>,
    window: AvailabilityWindow,
}

impl AgentDirectory {
    pub fn new(agents: Arc<dyn AgentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            agents,
            clock,
            window: AvailabilityWindow::default(),
        }
    }

    pub fn with_window(mut self, window: AvailabilityWindow) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> AvailabilityWindow {
        self.window
    }

    /// `Ok(true)` when the agent is on record, `AgentNotFound` otherwise.
    pub async fn agent_exists(&self, id: AgentId) -> Result<bool, ServiceError> {
        let count = self.agents.count_by_id(id).await?;
        if count == 0 {
            return Err(AgentMgmtError::agent_not_found(format!("agent {} not found", id)).into());
        }
        Ok(true)
    }

    /// Stamps `last_heartbeat` with the current clock reading. An id with
    /// no record is silently ignored; callers check existence first.
    pub async fn heartbeat(&self, id: AgentId) -> Result<(), ServiceError> {
        let now = self.clock.now();
        let touched = self.agents.update_heartbeat(id, now).await?;
        debug!(agent_id = %id, touched, at = %now, "Heartbeat recorded");
        Ok(())
    }

    /// Agents whose heartbeat is strictly after `since`, in insertion
    /// order. `limit <= 0` selects the default cap.
    pub async fn list_available(
        &self,
        since: DateTime<Utc>,
        limit: i32,
    ) -> Result<Vec<Agent>, ServiceError> {
        let cap = self.window.effective_limit(limit);
        Ok(self.agents.find_heartbeat_after(since, cap).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::errors::ErrorKind;
    use crate::infrastructure::repositories::InMemoryAgentRepository;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 9, 21, 17, 50, 31).unwrap()
    }

    async fn directory_with(ids: &[i32]) -> (AgentDirectory, Arc<InMemoryAgentRepository>, Arc<ManualClock>) {
        let repo = Arc::new(InMemoryAgentRepository::new());
        for id in ids {
            repo.save(&Agent::new(*id, t0())).await.unwrap();
        }
        let clock = Arc::new(ManualClock::new(t0()));
        (AgentDirectory::new(repo.clone(), clock.clone()), repo, clock)
    }

    #[tokio::test]
    async fn exists_or_agent_not_found() {
        let (directory, _, _) = directory_with(&[10, 11, 12]).await;

        assert!(directory.agent_exists(AgentId(10)).await.unwrap());
        let err = directory.agent_exists(AgentId(13)).await.unwrap_err();
        assert!(err.is(ErrorKind::AgentNotFound));
    }

    #[tokio::test]
    async fn heartbeat_uses_clock() {
        let (directory, repo, clock) = directory_with(&[10]).await;
        clock.advance(Duration::seconds(42));

        directory.heartbeat(AgentId(10)).await.unwrap();
        let agent = repo.find_by_id(AgentId(10)).await.unwrap().unwrap();
        assert_eq!(agent.last_heartbeat, t0() + Duration::seconds(42));
    }

    #[tokio::test]
    async fn heartbeat_on_unknown_agent_is_not_an_error() {
        let (directory, repo, _) = directory_with(&[]).await;
        directory.heartbeat(AgentId(99)).await.unwrap();
        assert_eq!(repo.count_by_id(AgentId(99)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_respects_limit_and_order() {
        let (directory, _, _) = directory_with(&[10, 11, 12, 13]).await;
        let since = t0() - Duration::seconds(60);

        for limit in 1..=5 {
            let agents = directory.list_available(since, limit).await.unwrap();
            let expected: Vec<i32> = [10, 11, 12, 13]
                .into_iter()
                .take((limit as usize).min(4))
                .collect();
            let got: Vec<i32> = agents.iter().map(|a| a.agent_id.0).collect();
            assert_eq!(got, expected, "limit {}", limit);
        }
    }

    #[tokio::test]
    async fn zero_limit_uses_default_cap() {
        let ids: Vec<i32> = (1..=15).collect();
        let (directory, _, _) = directory_with(&ids).await;

        let agents = directory
            .list_available(t0() - Duration::seconds(60), 0)
            .await
            .unwrap();
        assert_eq!(agents.len(), 10);
    }

    #[tokio::test]
    async fn empty_directory_lists_nothing() {
        let (directory, _, _) = directory_with(&[]).await;
        let agents = directory.list_available(t0(), 5).await.unwrap();
        assert!(agents.is_empty());
    }
}
