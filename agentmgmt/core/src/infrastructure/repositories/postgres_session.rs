// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::domain::agent::AgentId;
use crate::domain::repository::{PhoneSessionRepository, RepositoryError};
use crate::domain::session::PhoneSession;

pub struct PostgresPhoneSessionRepository {
    pool: PgPool,
}

impl PostgresPhoneSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhoneSessionRepository for PostgresPhoneSessionRepository {
    async fn save(&self, session: &PhoneSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO phonesessions (sess_id, agent_id, ref_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session.sess_id)
        .bind(session.agent_id.0)
        .bind(&session.ref_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_agent_id_by_ref(&self, ref_id: &str) -> Result<Option<AgentId>, RepositoryError> {
        // ref_id carries no unique index; the earliest binding wins.
        let agent_id: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT agent_id
            FROM phonesessions
            WHERE ref_id = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(ref_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(agent_id.map(AgentId))
    }
}
