// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Connection Pool
//!
//! Wraps `sqlx::postgres::PgPool` in a thin `Database` newtype that is
//! injected into every PostgreSQL repository. Also owns the embedded
//! schema migrations so the server and the `update` command apply the
//! same set.

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::domain::repository::PostgresConfig;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(connection_string: &str) -> Result<Self> {
        Self::with_max_connections(connection_string, 5).await
    }

    pub async fn from_config(config: &PostgresConfig) -> Result<Self> {
        Self::with_max_connections(&config.connection_string, config.max_connections).await
    }

    async fn with_max_connections(connection_string: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(connection_string)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies pending migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .context("Failed to apply migrations")?;
        info!(
            migrations = MIGRATOR.iter().count(),
            "Database schema up to date"
        );
        Ok(())
    }

    /// Number of migrations recorded as applied. Zero when the tracking
    /// table does not exist yet.
    pub async fn applied_migrations(&self) -> usize {
        sqlx::query("SELECT version FROM _sqlx_migrations")
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}
