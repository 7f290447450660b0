// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository ports defined in
//! `crate::domain::repository`.
//!
//! # Available Implementations
//!
//! ## PostgreSQL Repositories
//!
//! - **PostgresAgentRepository** - `agents` table, heartbeat window queries
//! - **PostgresPhoneSessionRepository** - `phonesessions` reference lookups
//! - **PostgresTaskRepository** - `tasks` inserts
//! - **PostgresCounterRepository** - `counters`, atomic `UPDATE ... RETURNING`
//!
//! ## In-Memory Repositories
//!
//! Lock-guarded implementations used for development and tests. They keep
//! insertion order and enforce the same uniqueness rules as the SQL schema.
//!
//! # Usage
//!
//! ```ignore
//! use sqlx::PgPool;
//! use repositories::postgres_agent::PostgresAgentRepository;
//!
//! let pool = PgPool::connect(&database_url).await?;
//! let repo = PostgresAgentRepository::new(pool);
//! let live = repo.find_heartbeat_after(since, 10).await?;
//! ```

pub mod postgres_agent;
pub mod postgres_counter;
pub mod postgres_session;
pub mod postgres_task;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::agent::{Agent, AgentId};
use crate::domain::repository::{
    AgentRepository, CounterRepository, PhoneSessionRepository, RepositoryError, TaskRepository,
};
use crate::domain::session::PhoneSession;
use crate::domain::task::{Task, TaskId};

#[derive(Clone, Default)]
pub struct InMemoryAgentRepository {
    // Vec keeps insertion order, which listing relies on.
    agents: Arc<RwLock<Vec<Agent>>>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn save(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let mut agents = self.agents.write();
        if agents.iter().any(|a| a.agent_id == agent.agent_id) {
            return Err(RepositoryError::Duplicate(format!(
                "agents(agent_id={})",
                agent.agent_id
            )));
        }
        agents.push(agent.clone());
        Ok(())
    }

    async fn count_by_id(&self, id: AgentId) -> Result<u64, RepositoryError> {
        let agents = self.agents.read();
        Ok(agents.iter().filter(|a| a.agent_id == id).count() as u64)
    }

    async fn update_heartbeat(&self, id: AgentId, at: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut agents = self.agents.write();
        let mut touched = 0;
        for agent in agents.iter_mut().filter(|a| a.agent_id == id) {
            agent.last_heartbeat = at;
            touched += 1;
        }
        Ok(touched)
    }

    async fn find_heartbeat_after(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Agent>, RepositoryError> {
        let agents = self.agents.read();
        Ok(agents
            .iter()
            .filter(|a| a.heartbeat_after(since))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError> {
        let agents = self.agents.read();
        Ok(agents.iter().find(|a| a.agent_id == id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPhoneSessionRepository {
    sessions: Arc<RwLock<Vec<PhoneSession>>>,
}

impl InMemoryPhoneSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhoneSessionRepository for InMemoryPhoneSessionRepository {
    async fn save(&self, session: &PhoneSession) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write();
        if sessions.iter().any(|s| s.sess_id == session.sess_id) {
            return Err(RepositoryError::Duplicate(format!(
                "phonesessions(sess_id={})",
                session.sess_id
            )));
        }
        sessions.push(session.clone());
        Ok(())
    }

    async fn find_agent_id_by_ref(&self, ref_id: &str) -> Result<Option<AgentId>, RepositoryError> {
        let sessions = self.sessions.read();
        Ok(sessions
            .iter()
            .find(|s| s.ref_id == ref_id)
            .map(|s| s.agent_id))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> Result<(), RepositoryError> {
        let mut tasks = self.tasks.write();
        if tasks.contains_key(&task.task_id) {
            return Err(RepositoryError::Duplicate(format!(
                "tasks(task_id={})",
                task.task_id
            )));
        }
        tasks.insert(task.task_id, task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, RepositoryError> {
        Ok(self.tasks.read().get(&id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCounterRepository {
    // A single mutex makes read-increment-return one critical section.
    counters: Arc<Mutex<HashMap<String, i32>>>,
}

impl InMemoryCounterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counters.lock().contains_key(name)
    }
}

#[async_trait]
impl CounterRepository for InMemoryCounterRepository {
    async fn create(&self, name: &str, initial: i32) -> Result<(), RepositoryError> {
        self.counters
            .lock()
            .entry(name.to_string())
            .or_insert(initial);
        Ok(())
    }

    async fn increment(&self, name: &str) -> Result<Option<i32>, RepositoryError> {
        let mut counters = self.counters.lock();
        match counters.get_mut(name) {
            Some(seq) => {
                *seq = seq.checked_add(1).ok_or_else(|| {
                    RepositoryError::Database(format!("counters(name={}) overflowed", name))
                })?;
                Ok(Some(*seq))
            }
            None => Ok(None),
        }
    }

    async fn current(&self, name: &str) -> Result<Option<i32>, RepositoryError> {
        Ok(self.counters.lock().get(name).copied())
    }
}
