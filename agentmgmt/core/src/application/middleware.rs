// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Service Decorators
//!
//! Wrappers that implement [`AgentMgmtService`] around another
//! implementation:
//!
//! - [`LoggingService`] emits one `tracing` event per call with the method,
//!   its inputs, its output and any error.
//! - [`InstrumentingService`] bumps a `metrics` counter per call, labelled
//!   with the outcome.
//!
//! Compose as `LoggingService::new(InstrumentingService::new(inner))`.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::service::{AgentMgmtService, HeartBeatStatus};
use crate::domain::agent::AgentId;
use crate::domain::errors::ServiceError;
use crate::domain::task::{CustId, TaskId};

pub const AVAILABLE_AGENTS_RETURNED: &str = "agent_mgmt_available_agents_returned_total";
pub const REFERENCES_RESOLVED: &str = "agent_mgmt_references_resolved_total";
pub const HEARTBEATS: &str = "agent_mgmt_heartbeats_total";
pub const TASKS_ADDED: &str = "agent_mgmt_tasks_added_total";

fn outcome<T>(result: &Result<T, ServiceError>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(e) => match e.kind() {
            Some(kind) => kind.name().to_string(),
            None => "storage".to_string(),
        },
    }
}

pub struct LoggingService {
    next: Arc<dyn AgentMgmtService>,
}

impl LoggingService {
    pub fn new(next: Arc<dyn AgentMgmtService>) -> Self {
        Self { next }
    }
}

#[async_trait]
impl AgentMgmtService for LoggingService {
    async fn get_available_agents(&self, limit: i32) -> Result<Vec<String>, ServiceError> {
        let result = self.next.get_available_agents(limit).await;
        match &result {
            Ok(ids) => info!(
                method = "GetAvailableAgents",
                limit,
                agent_ids = %ids.join(", "),
                "call"
            ),
            Err(e) => warn!(method = "GetAvailableAgents", limit, error = %e, "call"),
        }
        result
    }

    async fn get_agent_id_from_ref(&self, ref_id: &str) -> Result<AgentId, ServiceError> {
        let result = self.next.get_agent_id_from_ref(ref_id).await;
        match &result {
            Ok(agent_id) => info!(method = "GetAgentIDFromRef", ref_id, agent_id = %agent_id, "call"),
            Err(e) => warn!(method = "GetAgentIDFromRef", ref_id, error = %e, "call"),
        }
        result
    }

    async fn heart_beat(&self, agent_id: AgentId) -> Result<HeartBeatStatus, ServiceError> {
        let result = self.next.heart_beat(agent_id).await;
        let status = HeartBeatStatus::of(&result);
        match &result {
            Ok(_) => info!(method = "HeartBeat", agent_id = %agent_id, status = %status, "call"),
            Err(e) => warn!(
                method = "HeartBeat",
                agent_id = %agent_id,
                status = %status,
                error = %e,
                "call"
            ),
        }
        result
    }

    async fn add_task(&self, cust_id: CustId, agent_ids: Vec<AgentId>) -> Result<TaskId, ServiceError> {
        let requested = format!("{:?}", agent_ids.iter().map(|a| a.0).collect::<Vec<_>>());
        let result = self.next.add_task(cust_id, agent_ids).await;
        match &result {
            Ok(task_id) => info!(
                method = "AddTask",
                cust_id = %cust_id,
                agent_ids = %requested,
                task_id = %task_id,
                "call"
            ),
            Err(e) => warn!(
                method = "AddTask",
                cust_id = %cust_id,
                agent_ids = %requested,
                error = %e,
                "call"
            ),
        }
        result
    }
}

pub struct InstrumentingService {
    next: Arc<dyn AgentMgmtService>,
}

impl InstrumentingService {
    pub fn new(next: Arc<dyn AgentMgmtService>) -> Self {
        Self { next }
    }
}

#[async_trait]
impl AgentMgmtService for InstrumentingService {
    async fn get_available_agents(&self, limit: i32) -> Result<Vec<String>, ServiceError> {
        let result = self.next.get_available_agents(limit).await;
        let returned = result.as_ref().map(|ids| ids.len() as u64).unwrap_or(0);
        metrics::counter!(AVAILABLE_AGENTS_RETURNED, "outcome" => outcome(&result)).increment(returned);
        result
    }

    async fn get_agent_id_from_ref(&self, ref_id: &str) -> Result<AgentId, ServiceError> {
        let result = self.next.get_agent_id_from_ref(ref_id).await;
        metrics::counter!(REFERENCES_RESOLVED, "outcome" => outcome(&result)).increment(1);
        result
    }

    async fn heart_beat(&self, agent_id: AgentId) -> Result<HeartBeatStatus, ServiceError> {
        let result = self.next.heart_beat(agent_id).await;
        metrics::counter!(HEARTBEATS, "outcome" => outcome(&result)).increment(1);
        result
    }

    async fn add_task(&self, cust_id: CustId, agent_ids: Vec<AgentId>) -> Result<TaskId, ServiceError> {
        let result = self.next.add_task(cust_id, agent_ids).await;
        metrics::counter!(TASKS_ADDED, "outcome" => outcome(&result)).increment(1);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repository_factory::{create_service, prepare, Repositories};
    use crate::domain::agent::{Agent, AvailabilityWindow};
    use crate::domain::clock::SystemClock;
    use crate::domain::errors::{AgentMgmtError, ErrorKind};
    use crate::domain::repository::{AgentRepository, RepositoryError};
    use chrono::Utc;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    #[test]
    fn outcome_labels() {
        let ok: Result<(), ServiceError> = Ok(());
        assert_eq!(outcome(&ok), "ok");

        let typed: Result<(), ServiceError> = Err(AgentMgmtError::agent_not_found("x").into());
        assert_eq!(outcome(&typed), ErrorKind::AgentNotFound.name());

        let storage: Result<(), ServiceError> =
            Err(RepositoryError::Database("connection reset".into()).into());
        assert_eq!(outcome(&storage), "storage");
    }

    #[test]
    fn heartbeats_are_counted_by_outcome() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let repos = Repositories::in_memory();
                prepare(&repos).await.unwrap();
                repos.agents.save(&Agent::new(10, Utc::now())).await.unwrap();

                let service = InstrumentingService::new(Arc::new(create_service(
                    &repos,
                    Arc::new(SystemClock),
                    AvailabilityWindow::default(),
                )));
                service.heart_beat(AgentId(10)).await.unwrap();
                service.heart_beat(AgentId(10)).await.unwrap();
                assert!(service.heart_beat(AgentId(13)).await.is_err());
            });
        });

        let snapshot = snapshotter.snapshot().into_vec();
        let heartbeats = |label: &str| {
            snapshot
                .iter()
                .find_map(|(key, _, _, value)| {
                    let key = key.key();
                    let matches = key.name() == HEARTBEATS
                        && key
                            .labels()
                            .any(|l| l.key() == "outcome" && l.value() == label);
                    match (matches, value) {
                        (true, DebugValue::Counter(n)) => Some(*n),
                        _ => None,
                    }
                })
        };

        assert_eq!(heartbeats("ok"), Some(2));
        assert_eq!(heartbeats(ErrorKind::AgentNotFound.name()), Some(1));
        assert_eq!(heartbeats("storage"), None);
    }
}
