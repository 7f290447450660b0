// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod agent_directory;
pub mod middleware;
pub mod reference_resolver;
pub mod repository_factory;
pub mod sequence;
pub mod service;
pub mod task_allocator;

pub use repository_factory::{create_decorated_service, create_service, prepare, Repositories};
pub use service::{AgentMgmtService, HeartBeatStatus, StandardAgentMgmtService};
