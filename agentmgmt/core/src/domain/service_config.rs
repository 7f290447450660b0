// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Service Configuration Types
//
// Kubernetes-style manifest for an agent-mgmt deployment:
// - gRPC server binding and request timeout
// - Storage backend (in-memory or PostgreSQL)
// - Availability window and default listing cap
// - Log level

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::agent::AvailabilityWindow;
use crate::domain::repository::{PostgresConfig, StorageBackend};

pub const API_VERSION: &str = "newtonsystems.com/v1";
pub const KIND: &str = "AgentMgmtConfig";

/// Upper bound for `spec.availability.window_secs` (one week).
pub const MAX_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Top-level configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfigManifest {
    /// API version (must be "newtonsystems.com/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "AgentMgmtConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: ServiceConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Deployment name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfigSpec {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub availability: AvailabilityConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,

    /// Upper bound on a single RPC, storage round trips included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageKind {
    InMemory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_kind")]
    pub backend: StorageKind,

    /// PostgreSQL connection string (required for the postgres backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Heartbeats older than this are considered offline
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Cap applied when a caller asks for limit 0
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_grpc_port() -> u16 {
    50000
}

fn default_request_timeout() -> u64 {
    10
}

fn default_storage_kind() -> StorageKind {
    StorageKind::InMemory
}

fn default_max_connections() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    AvailabilityWindow::DEFAULT_WINDOW_SECS as u64
}

fn default_limit() -> usize {
    AvailabilityWindow::DEFAULT_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            grpc_port: default_grpc_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_kind(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            default_limit: default_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ServiceConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "agent-mgmt".to_string(),
                version: None,
                labels: None,
            },
            spec: ServiceConfigSpec::default(),
        }
    }
}

impl ServiceConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate locations in precedence order, after `--config`
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var("AGENT_MGMT_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }
        paths.push(PathBuf::from("./agent-mgmt-config.yaml"));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".agent-mgmt").join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/agent-mgmt/config.yaml"));
        paths
    }

    /// Discover configuration file using precedence order
    /// 1. AGENT_MGMT_CONFIG_PATH environment variable
    /// 2. ./agent-mgmt-config.yaml (working directory)
    /// 3. ~/.agent-mgmt/config.yaml (user home)
    /// 4. /etc/agent-mgmt/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Environment overrides for container deployments
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("AGENT_MGMT_DATABASE_URL") {
            tracing::info!("Environment override: AGENT_MGMT_DATABASE_URL (postgres backend)");
            self.spec.storage.backend = StorageKind::Postgres;
            self.spec.storage.database_url = Some(url);
        }

        if let Ok(val) = std::env::var("AGENT_MGMT_GRPC_PORT") {
            match val.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: AGENT_MGMT_GRPC_PORT={}", port);
                    self.spec.server.grpc_port = port;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for AGENT_MGMT_GRPC_PORT: '{}'. Expected a port number. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.storage.backend == StorageKind::Postgres
            && self.spec.storage.database_url.as_deref().unwrap_or("").is_empty()
        {
            anyhow::bail!("spec.storage.database_url is required for the postgres backend");
        }

        if self.spec.storage.max_connections == 0 {
            anyhow::bail!("spec.storage.max_connections must be at least 1");
        }

        if self.spec.availability.window_secs == 0 {
            anyhow::bail!("spec.availability.window_secs must be greater than 0");
        }

        if self.spec.availability.window_secs > MAX_WINDOW_SECS {
            anyhow::bail!(
                "spec.availability.window_secs must be at most {}",
                MAX_WINDOW_SECS
            );
        }

        if self.spec.availability.default_limit == 0 {
            anyhow::bail!("spec.availability.default_limit must be greater than 0");
        }

        if self.spec.server.request_timeout_secs == 0 {
            anyhow::bail!("spec.server.request_timeout_secs must be greater than 0");
        }

        Ok(())
    }

    pub fn storage_backend(&self) -> StorageBackend {
        match (&self.spec.storage.backend, &self.spec.storage.database_url) {
            (StorageKind::Postgres, Some(url)) => StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: url.clone(),
                max_connections: self.spec.storage.max_connections,
            }),
            _ => StorageBackend::InMemory,
        }
    }

    /// Window built from `spec.availability`. Values above
    /// [`MAX_WINDOW_SECS`] are clamped.
    pub fn availability_window(&self) -> AvailabilityWindow {
        let secs = self.spec.availability.window_secs.min(MAX_WINDOW_SECS) as i64;
        AvailabilityWindow::new(Duration::seconds(secs), self.spec.availability.default_limit)
    }

    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.spec.server.bind_address, self.spec.server.grpc_port)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.spec.server.request_timeout_secs)
    }
}
