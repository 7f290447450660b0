// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Error Wire Codec
//!
//! Carries typed service errors across the gRPC boundary. Every failure
//! travels with status code `Unknown`; the kind of a typed error rides in
//! the `errortype` metadata entry as a decimal integer, and the status
//! message carries the detail.
//!
//! | Server side (`wrap_error`) | Client side (`unwrap_error`) |
//! |----------------------------|------------------------------|
//! | `ServiceError::Typed(kind)` → `Unknown` + `errortype: <code>` | one entry → `ClientError::Service(kind)` |
//! | `ServiceError::Repository` → `Unknown`, no metadata | no entry → `ClientError::Transport(status)` |
//! | | several entries, non-integer or unknown code → `InternalServer` |

use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::{Code, Status};

use crate::domain::errors::{AgentMgmtError, ErrorKind, ServiceError};

pub const ERROR_TYPE_KEY: &str = "errortype";

/// Error seen by a gRPC client of the service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Typed failure decoded from the response metadata.
    #[error("{0}")]
    Service(#[source] AgentMgmtError),

    /// Anything without a typed error attached, passed through as-is.
    #[error("transport error: {0}")]
    Transport(Status),
}

impl ClientError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ClientError::Service(e) => Some(e.kind()),
            ClientError::Transport(_) => None,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }
}

/// Converts a service failure into the status returned to the client.
pub fn wrap_error(err: &ServiceError) -> Status {
    match err {
        ServiceError::Typed(typed) => {
            let mut metadata = MetadataMap::new();
            metadata.insert(ERROR_TYPE_KEY, MetadataValue::from(typed.kind().code()));
            Status::with_metadata(Code::Unknown, typed.detail(), metadata)
        }
        ServiceError::Repository(e) => Status::unknown(e.to_string()),
    }
}

/// Recovers the typed error, if any, from a failed call's status.
pub fn unwrap_error(status: Status) -> ClientError {
    // Entries that are not visible ASCII decode to `None`.
    let values: Vec<Option<String>> = status
        .metadata()
        .get_all(ERROR_TYPE_KEY)
        .iter()
        .map(|v| v.to_str().ok().map(str::to_string))
        .collect();

    let raw = match values.as_slice() {
        [] => return ClientError::Transport(status),
        [single] => single.clone(),
        several => {
            return ClientError::Service(AgentMgmtError::internal_server(format!(
                "expected one {} entry, found {}",
                ERROR_TYPE_KEY,
                several.len()
            )))
        }
    };

    let code = match raw.as_deref().and_then(|s| s.trim().parse::<i32>().ok()) {
        Some(code) => code,
        None => {
            return ClientError::Service(AgentMgmtError::internal_server(format!(
                "{} value {:?} is not an integer",
                ERROR_TYPE_KEY,
                raw.unwrap_or_default()
            )))
        }
    };

    match ErrorKind::from_code(code) {
        Some(kind) => ClientError::Service(AgentMgmtError::new(kind, status.message())),
        None => ClientError::Service(AgentMgmtError::internal_server(format!(
            "unknown {} {}: {}",
            ERROR_TYPE_KEY,
            code,
            status.message()
        ))),
    }
}
