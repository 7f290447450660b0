// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Agent Repository
//!
//! `AgentRepository` backed by the `agents` table. The surrogate `id`
//! column is a `BIGSERIAL`, so ordering by it reproduces insertion order
//! for availability listings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::agent::{Agent, AgentId};
use crate::domain::repository::{AgentRepository, RepositoryError};

pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn agent_from_row(row: &PgRow) -> Agent {
    let agent_id: i32 = row.get("agent_id");
    let last_heartbeat: DateTime<Utc> = row.get("last_heartbeat");
    Agent {
        agent_id: AgentId(agent_id),
        last_heartbeat,
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn save(&self, agent: &Agent) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO agents (agent_id, last_heartbeat)
            VALUES ($1, $2)
            "#,
        )
        .bind(agent.agent_id.0)
        .bind(agent.last_heartbeat)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_by_id(&self, id: AgentId) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agents WHERE agent_id = $1")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn update_heartbeat(&self, id: AgentId, at: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE agents SET last_heartbeat = $2 WHERE agent_id = $1")
            .bind(id.0)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_heartbeat_after(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Agent>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT agent_id, last_heartbeat
            FROM agents
            WHERE last_heartbeat > $1
            ORDER BY id ASC
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(agent_from_row).collect())
    }

    async fn find_by_id(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query("SELECT agent_id, last_heartbeat FROM agents WHERE agent_id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(agent_from_row))
    }
}
