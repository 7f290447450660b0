// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates concrete repository implementations for the configured
//! [`StorageBackend`] and wires them into the decorated service. The domain
//! layer only sees the repository traits; this module is the one place
//! that knows which implementation backs them.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::application::agent_directory::AgentDirectory;
use crate::application::middleware::{InstrumentingService, LoggingService};
use crate::application::reference_resolver::ReferenceResolver;
use crate::application::sequence::SequenceAllocator;
use crate::application::service::{AgentMgmtService, StandardAgentMgmtService};
use crate::application::task_allocator::TaskAllocator;
use crate::domain::agent::AvailabilityWindow;
use crate::domain::clock::Clock;
use crate::domain::repository::{
    AgentRepository, CounterRepository, PhoneSessionRepository, StorageBackend, TaskRepository,
};
use crate::domain::task::TASK_ID_COUNTER;
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::postgres_agent::PostgresAgentRepository;
use crate::infrastructure::repositories::postgres_counter::PostgresCounterRepository;
use crate::infrastructure::repositories::postgres_session::PostgresPhoneSessionRepository;
use crate::infrastructure::repositories::postgres_task::PostgresTaskRepository;
use crate::infrastructure::repositories::{
    InMemoryAgentRepository, InMemoryCounterRepository, InMemoryPhoneSessionRepository,
    InMemoryTaskRepository,
};

/// Value the task id counter starts from. The first task gets `seed + 1`.
pub const TASK_ID_SEED: i32 = 1;

/// One handle per collection, all backed by the same storage.
#[derive(Clone)]
pub struct Repositories {
    pub agents: Arc<dyn AgentRepository>,
    pub sessions: Arc<dyn PhoneSessionRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub counters: Arc<dyn CounterRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            agents: Arc::new(InMemoryAgentRepository::new()),
            sessions: Arc::new(InMemoryPhoneSessionRepository::new()),
            tasks: Arc::new(InMemoryTaskRepository::new()),
            counters: Arc::new(InMemoryCounterRepository::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            agents: Arc::new(PostgresAgentRepository::new(pool.clone())),
            sessions: Arc::new(PostgresPhoneSessionRepository::new(pool.clone())),
            tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
            counters: Arc::new(PostgresCounterRepository::new(pool)),
        }
    }

    /// Connects (and migrates) when the backend is PostgreSQL.
    pub async fn for_backend(backend: &StorageBackend) -> Result<Self> {
        match backend {
            StorageBackend::InMemory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::PostgreSQL(config) => {
                info!(
                    max_connections = config.max_connections,
                    "Using PostgreSQL storage"
                );
                let db = Database::from_config(config).await?;
                db.migrate().await?;
                Ok(Self::postgres(db.get_pool().clone()))
            }
        }
    }
}

/// Seeds the counters the service depends on. Existing counters keep
/// their value, so this is safe on every start.
pub async fn prepare(repos: &Repositories) -> Result<()> {
    repos
        .counters
        .create(TASK_ID_COUNTER, TASK_ID_SEED)
        .await
        .with_context(|| format!("Failed to seed counter '{}'", TASK_ID_COUNTER))?;
    Ok(())
}

/// Undecorated service over `repos`.
pub fn create_service(
    repos: &Repositories,
    clock: Arc<dyn Clock>,
    window: AvailabilityWindow,
) -> StandardAgentMgmtService {
    let directory =
        Arc::new(AgentDirectory::new(repos.agents.clone(), clock.clone()).with_window(window));
    let resolver = Arc::new(ReferenceResolver::new(repos.sessions.clone()));
    let sequence = Arc::new(SequenceAllocator::new(repos.counters.clone()));
    let tasks = Arc::new(TaskAllocator::new(
        repos.tasks.clone(),
        sequence,
        clock.clone(),
    ));

    StandardAgentMgmtService::new(directory, resolver, tasks, clock)
}

/// Service with logging and instrumentation layered on.
pub fn create_decorated_service(
    repos: &Repositories,
    clock: Arc<dyn Clock>,
    window: AvailabilityWindow,
) -> Arc<dyn AgentMgmtService> {
    let inner: Arc<dyn AgentMgmtService> = Arc::new(create_service(repos, clock, window));
    let instrumented: Arc<dyn AgentMgmtService> = Arc::new(InstrumentingService::new(inner));
    Arc::new(LoggingService::new(instrumented))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::SystemClock;
    use crate::domain::task::CustId;

    #[tokio::test]
    async fn prepare_is_idempotent() {
        let repos = Repositories::in_memory();
        prepare(&repos).await.unwrap();
        assert_eq!(repos.counters.increment(TASK_ID_COUNTER).await.unwrap(), Some(2));

        prepare(&repos).await.unwrap();
        assert_eq!(repos.counters.current(TASK_ID_COUNTER).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn in_memory_backend_serves_tasks() {
        let repos = Repositories::for_backend(&StorageBackend::InMemory).await.unwrap();
        prepare(&repos).await.unwrap();
        let service =
            create_decorated_service(&repos, Arc::new(SystemClock), AvailabilityWindow::default());

        let task_id = service.add_task(CustId(1), vec![]).await.unwrap();
        assert_eq!(task_id.0, 2);
    }
}
