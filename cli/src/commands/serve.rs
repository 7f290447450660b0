// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Server Command
//!
//! Runs the gRPC service in the foreground until Ctrl+C or SIGTERM.
//!
//! ```bash
//! agent-mgmt serve
//! agent-mgmt --config ./agent-mgmt-config.yaml --port 50001 serve
//! ```

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use agent_mgmt_core::application::repository_factory::{create_decorated_service, prepare, Repositories};
use agent_mgmt_core::domain::clock::SystemClock;
use agent_mgmt_core::domain::service_config::ServiceConfigManifest;
use agent_mgmt_core::presentation::grpc::server::start_grpc_server;

/// Loads and validates the server configuration. `port`, when given,
/// replaces `spec.server.grpc_port`.
pub fn load_config(config_path: Option<PathBuf>, port: Option<u16>) -> Result<ServiceConfigManifest> {
    let mut config = ServiceConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;
    if let Some(port) = port {
        config.spec.server.grpc_port = port;
    }
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

pub async fn execute(config_path: Option<PathBuf>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path, port)?;

    let addr: SocketAddr = config
        .grpc_addr()
        .parse()
        .with_context(|| format!("Invalid gRPC bind address '{}'", config.grpc_addr()))?;

    let repos = Repositories::for_backend(&config.storage_backend()).await?;
    prepare(&repos).await?;

    let service = create_decorated_service(
        &repos,
        Arc::new(SystemClock),
        config.availability_window(),
    );

    start_grpc_server(addr, service, config.request_timeout(), shutdown_signal())
        .await
        .context("gRPC server failed")?;

    info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
