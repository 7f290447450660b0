// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Counter Repository
//!
//! Named sequences in the `counters` table. `increment` is a single
//! `UPDATE ... RETURNING` statement, so the row lock taken by the update
//! serialises concurrent allocators without any read-modify-write on our
//! side. An absent row yields no returned value and is never inserted.

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::domain::repository::{CounterRepository, RepositoryError};

pub struct PostgresCounterRepository {
    pool: PgPool,
}

impl PostgresCounterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterRepository for PostgresCounterRepository {
    async fn create(&self, name: &str, initial: i32) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO counters (name, seq)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(initial)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment(&self, name: &str) -> Result<Option<i32>, RepositoryError> {
        let seq: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE counters
            SET seq = seq + 1
            WHERE name = $1
            RETURNING seq
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seq)
    }

    async fn current(&self, name: &str) -> Result<Option<i32>, RepositoryError> {
        let seq: Option<i32> = sqlx::query_scalar("SELECT seq FROM counters WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(seq)
    }
}
