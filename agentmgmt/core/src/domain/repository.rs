// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for each collection the service touches. The
//! interfaces live in the domain layer and are implemented in
//! `crate::infrastructure::repositories`.
//!
//! | Trait | Collection | Implementations |
//! |-------|-----------|----------------|
//! | `AgentRepository` | `agents` | `InMemoryAgentRepository`, `PostgresAgentRepository` |
//! | `PhoneSessionRepository` | `phonesessions` | `InMemoryPhoneSessionRepository`, `PostgresPhoneSessionRepository` |
//! | `TaskRepository` | `tasks` | `InMemoryTaskRepository`, `PostgresTaskRepository` |
//! | `CounterRepository` | `counters` | `InMemoryCounterRepository`, `PostgresCounterRepository` |
//!
//! Repositories stay policy-free: a missing row comes back as `None` or a
//! zero count, and the application layer decides which typed error that
//! becomes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::agent::{Agent, AgentId};
use crate::domain::session::PhoneSession;
use crate::domain::task::{Task, TaskId};

/// Storage backend selected at composition time
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
}

#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Insert an agent record. Fails if the id is already present.
    async fn save(&self, agent: &Agent) -> Result<(), RepositoryError>;

    /// Number of records carrying `id` (0 or 1 under the unique index).
    async fn count_by_id(&self, id: AgentId) -> Result<u64, RepositoryError>;

    /// Set `last_heartbeat`; returns the number of records touched.
    async fn update_heartbeat(&self, id: AgentId, at: DateTime<Utc>) -> Result<u64, RepositoryError>;

    /// Agents with `last_heartbeat > since`, insertion order, at most `limit`.
    async fn find_heartbeat_after(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Agent>, RepositoryError>;

    async fn find_by_id(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError>;
}

#[async_trait]
pub trait PhoneSessionRepository: Send + Sync {
    async fn save(&self, session: &PhoneSession) -> Result<(), RepositoryError>;

    /// Agent bound to the first session whose `ref_id` matches.
    async fn find_agent_id_by_ref(&self, ref_id: &str) -> Result<Option<AgentId>, RepositoryError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: &Task) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, RepositoryError>;
}

#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Create a counter. Existing counters are left untouched.
    async fn create(&self, name: &str, initial: i32) -> Result<(), RepositoryError>;

    /// Atomically add one to `seq` and return the new value, `None` if the
    /// counter does not exist. Must never create the counter.
    async fn increment(&self, name: &str) -> Result<Option<i32>, RepositoryError>;

    async fn current(&self, name: &str) -> Result<Option<i32>, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(db.message().to_string())
            }
            other => RepositoryError::Database(other.to_string()),
        }
    }
}
