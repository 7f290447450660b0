// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! gRPC Server Implementation for the Agent Management service
//! Exposes GetAvailableAgents, GetAgentIDFromRef, HeartBeat, AddTask

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use crate::application::service::{AgentMgmtService, HeartBeatStatus};
use crate::domain::agent::AgentId;
use crate::domain::task::CustId;
use crate::presentation::grpc::error_codec::wrap_error;
use crate::presentation::grpc::proto::agent_mgmt_server::{AgentMgmt, AgentMgmtServer};
use crate::presentation::grpc::proto::heart_beat_response;
use crate::presentation::grpc::proto::*;

/// Implementation of the AgentMgmt gRPC service
pub struct AgentMgmtGrpcService {
    service: Arc<dyn AgentMgmtService>,
}

impl AgentMgmtGrpcService {
    pub fn new(service: Arc<dyn AgentMgmtService>) -> Self {
        Self { service }
    }

    /// Create a gRPC server instance
    pub fn into_server(self) -> AgentMgmtServer<Self> {
        AgentMgmtServer::new(self)
    }
}

impl From<HeartBeatStatus> for heart_beat_response::HeartBeatStatus {
    fn from(status: HeartBeatStatus) -> Self {
        match status {
            HeartBeatStatus::Successful => heart_beat_response::HeartBeatStatus::Successful,
            HeartBeatStatus::Failed => heart_beat_response::HeartBeatStatus::Failed,
        }
    }
}

#[tonic::async_trait]
impl AgentMgmt for AgentMgmtGrpcService {
    async fn get_available_agents(
        &self,
        request: Request<GetAvailableAgentsRequest>,
    ) -> Result<Response<GetAvailableAgentsResponse>, Status> {
        let req = request.into_inner();
        let agent_ids = self
            .service
            .get_available_agents(req.limit)
            .await
            .map_err(|e| wrap_error(&e))?;

        Ok(Response::new(GetAvailableAgentsResponse { agent_ids }))
    }

    async fn get_agent_id_from_ref(
        &self,
        request: Request<GetAgentIdFromRefRequest>,
    ) -> Result<Response<GetAgentIdFromRefResponse>, Status> {
        let req = request.into_inner();
        let agent_id = self
            .service
            .get_agent_id_from_ref(&req.ref_id)
            .await
            .map_err(|e| wrap_error(&e))?;

        Ok(Response::new(GetAgentIdFromRefResponse {
            agent_id: agent_id.0,
        }))
    }

    async fn heart_beat(
        &self,
        request: Request<HeartBeatRequest>,
    ) -> Result<Response<HeartBeatResponse>, Status> {
        let req = request.into_inner();
        let status = self
            .service
            .heart_beat(AgentId(req.agent_id))
            .await
            .map_err(|e| wrap_error(&e))?;

        let mut response = HeartBeatResponse::default();
        response.set_status(status.into());
        Ok(Response::new(response))
    }

    async fn add_task(
        &self,
        request: Request<AddTaskRequest>,
    ) -> Result<Response<AddTaskResponse>, Status> {
        let req = request.into_inner();
        let agent_ids = req.call_ids.into_iter().map(AgentId).collect();
        let task_id = self
            .service
            .add_task(CustId(req.cust_id), agent_ids)
            .await
            .map_err(|e| wrap_error(&e))?;

        Ok(Response::new(AddTaskResponse { task_id: task_id.0 }))
    }
}

/// Start the gRPC server on `addr`, stopping when `shutdown` resolves.
pub async fn start_grpc_server<F>(
    addr: SocketAddr,
    service: Arc<dyn AgentMgmtService>,
    request_timeout: Duration,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()> + Send,
{
    let server = AgentMgmtGrpcService::new(service).into_server();

    tracing::info!("Starting Agent Management gRPC server on {}", addr);

    tonic::transport::Server::builder()
        .timeout(request_timeout)
        .add_service(server)
        .serve_with_shutdown(addr, shutdown)
        .await
}

/// Same as [`start_grpc_server`] over an already bound listener.
pub async fn serve_on_listener<F>(
    listener: TcpListener,
    service: Arc<dyn AgentMgmtService>,
    request_timeout: Duration,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()> + Send,
{
    let server = AgentMgmtGrpcService::new(service).into_server();

    tonic::transport::Server::builder()
        .timeout(request_timeout)
        .add_service(server)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
