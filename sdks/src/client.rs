// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use tonic::transport::Channel;
use tracing::debug;

use agent_mgmt_core::application::service::HeartBeatStatus;
use agent_mgmt_core::domain::agent::AgentId;
use agent_mgmt_core::domain::task::{CustId, TaskId};
use agent_mgmt_core::presentation::grpc::error_codec::{unwrap_error, ClientError};
use agent_mgmt_core::presentation::grpc::proto::agent_mgmt_client::AgentMgmtClient as RawClient;
use agent_mgmt_core::presentation::grpc::proto::heart_beat_response;
use agent_mgmt_core::presentation::grpc::proto::{
    AddTaskRequest, GetAgentIdFromRefRequest, GetAvailableAgentsRequest, HeartBeatRequest,
};

/// Client for the agent management service.
///
/// Failed calls come back as [`ClientError::Service`] when the server
/// attached a typed error, and as [`ClientError::Transport`] otherwise.
#[derive(Clone)]
pub struct AgentMgmtClient {
    inner: RawClient<Channel>,
}

impl AgentMgmtClient {
    /// Connect to a server, e.g. `http://127.0.0.1:50000`.
    pub async fn connect(endpoint: impl Into<String>) -> Result<Self, tonic::transport::Error> {
        let endpoint = endpoint.into();
        debug!(endpoint = %endpoint, "Connecting to agent management service");
        let inner = RawClient::connect(endpoint).await?;
        Ok(Self { inner })
    }

    /// Wrap an already configured channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: RawClient::new(channel),
        }
    }

    /// Ids of agents that sent a heartbeat within the server's window.
    /// `0` asks for the server default cap.
    pub async fn get_available_agents(&mut self, limit: i32) -> Result<Vec<String>, ClientError> {
        let response = self
            .inner
            .get_available_agents(GetAvailableAgentsRequest { limit })
            .await
            .map_err(unwrap_error)?;
        Ok(response.into_inner().agent_ids)
    }

    pub async fn get_agent_id_from_ref(&mut self, ref_id: &str) -> Result<AgentId, ClientError> {
        let response = self
            .inner
            .get_agent_id_from_ref(GetAgentIdFromRefRequest {
                ref_id: ref_id.to_string(),
            })
            .await
            .map_err(unwrap_error)?;
        Ok(AgentId(response.into_inner().agent_id))
    }

    pub async fn heart_beat(&mut self, agent_id: AgentId) -> Result<HeartBeatStatus, ClientError> {
        let response = self
            .inner
            .heart_beat(HeartBeatRequest { agent_id: agent_id.0 })
            .await
            .map_err(unwrap_error)?;

        Ok(match response.into_inner().status() {
            heart_beat_response::HeartBeatStatus::Successful => HeartBeatStatus::Successful,
            heart_beat_response::HeartBeatStatus::Failed => HeartBeatStatus::Failed,
        })
    }

    /// Creates a task. Not safe to retry blindly: a call that timed out
    /// may still have allocated an id.
    pub async fn add_task(
        &mut self,
        cust_id: CustId,
        agent_ids: &[AgentId],
    ) -> Result<TaskId, ClientError> {
        let response = self
            .inner
            .add_task(AddTaskRequest {
                cust_id: cust_id.0,
                call_ids: agent_ids.iter().map(|a| a.0).collect(),
            })
            .await
            .map_err(unwrap_error)?;
        Ok(TaskId(response.into_inner().task_id))
    }
}
