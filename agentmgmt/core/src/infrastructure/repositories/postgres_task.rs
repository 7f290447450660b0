// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::Row;

use crate::domain::agent::AgentId;
use crate::domain::repository::{RepositoryError, TaskRepository};
use crate::domain::task::{CustId, Task, TaskId};

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> Result<(), RepositoryError> {
        let agent_ids: Vec<i32> = task.agent_ids.iter().map(|a| a.0).collect();

        sqlx::query(
            r#"
            INSERT INTO tasks (task_id, cust_id, agent_ids, added_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(task.task_id.0)
        .bind(task.cust_id.0)
        .bind(agent_ids)
        .bind(task.added_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT task_id, cust_id, agent_ids, added_at
            FROM tasks
            WHERE task_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let task_id: i32 = row.get("task_id");
            let cust_id: i32 = row.get("cust_id");
            let agent_ids: Vec<i32> = row.get("agent_ids");
            let added_at: DateTime<Utc> = row.get("added_at");
            Task {
                task_id: TaskId(task_id),
                cust_id: CustId(cust_id),
                agent_ids: agent_ids.into_iter().map(AgentId).collect(),
                added_at,
            }
        }))
    }
}
