// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Database Update Command
//!
//! Applies the embedded schema migrations and seeds the counters the
//! service needs.
//!
//! ```bash
//! # Apply all pending migrations
//! agent-mgmt update
//!
//! # Preview migrations without applying
//! agent-mgmt update --dry-run
//! ```
//!
//! The database URL comes from the configuration's `spec.storage`, which
//! `AGENT_MGMT_DATABASE_URL` overrides.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use agent_mgmt_core::application::repository_factory::{prepare, Repositories};
use agent_mgmt_core::domain::repository::StorageBackend;
use agent_mgmt_core::domain::service_config::ServiceConfigManifest;
use agent_mgmt_core::infrastructure::db::{Database, MIGRATOR};

#[derive(Args)]
pub struct UpdateCommand {
    /// Perform a dry run without applying changes
    #[arg(long)]
    dry_run: bool,
}

pub async fn execute(cmd: UpdateCommand, config_path: Option<PathBuf>) -> Result<()> {
    println!("{}", "Agent Management Update".bold().green());

    let config = ServiceConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;
    let postgres = match config.storage_backend() {
        StorageBackend::PostgreSQL(pg) => pg,
        StorageBackend::InMemory => anyhow::bail!(
            "No PostgreSQL database configured. Set AGENT_MGMT_DATABASE_URL or spec.storage.database_url."
        ),
    };

    println!("Connecting to database...");
    let db = Database::new(&postgres.connection_string).await?;

    let applied_count = db.applied_migrations().await;
    let total_migrations = MIGRATOR.iter().count();

    println!(
        "Migration status: {} applied, {} total available.",
        applied_count, total_migrations
    );

    if applied_count < total_migrations {
        if cmd.dry_run {
            println!("Pending migrations found (Dry Run):");
            for migration in MIGRATOR.iter().skip(applied_count) {
                println!(" - {} {}", migration.version, migration.description);
            }
            println!("Skipping application due to --dry-run");
            return Ok(());
        }

        println!("Applying pending migrations...");
        db.migrate().await?;
        println!("{}", "✓ Database updated successfully.".green());
    } else {
        println!("{}", "✓ Database is up to date.".green());
    }

    prepare(&Repositories::postgres(db.get_pool().clone())).await?;
    println!("{}", "✓ Counters seeded.".green());

    Ok(())
}
