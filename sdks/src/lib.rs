// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent Management Rust SDK
//!
//! Thin typed wrapper over the generated gRPC client that turns the
//! `errortype` response metadata back into [`AgentMgmtError`] values.

pub mod client;

pub use agent_mgmt_core::application::service::HeartBeatStatus;
pub use agent_mgmt_core::domain::agent::AgentId;
pub use agent_mgmt_core::domain::errors::{is, AgentMgmtError, ErrorKind};
pub use agent_mgmt_core::domain::task::{CustId, TaskId};
pub use agent_mgmt_core::presentation::grpc::error_codec::ClientError;
pub use client::AgentMgmtClient;
