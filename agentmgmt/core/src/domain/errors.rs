// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Typed Service Errors
//!
//! A small closed taxonomy of application errors. Each kind has a stable
//! integer code because the code, not the name, crosses the gRPC boundary
//! (see `crate::presentation::grpc::error_codec`). Names are for logs only.
//!
//! Callers branch on kind with [`is`] or [`ServiceError::kind`]; the
//! `detail` text is diagnostic and is never matched on.

use std::fmt;

use crate::domain::repository::RepositoryError;

/// Coarse category of an [`AgentMgmtError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorKind {
    InternalServer = 0,
    // 1 is reserved and never issued.
    AgentIdNotFound = 2,
    AgentNotFound = 3,
    CustIdInvalid = 4,
    CounterNotFound = 5,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::InternalServer,
        ErrorKind::AgentIdNotFound,
        ErrorKind::AgentNotFound,
        ErrorKind::CustIdInvalid,
        ErrorKind::CounterNotFound,
    ];

    /// Stable wire code.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::InternalServer => "InternalServer",
            ErrorKind::AgentIdNotFound => "ErrAgentIDNotFound",
            ErrorKind::AgentNotFound => "ErrAgentNotFound",
            ErrorKind::CustIdInvalid => "ErrCustIDInvalid",
            ErrorKind::CounterNotFound => "ErrCounterNotFound",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Human readable name for a raw error code. Codes outside the taxonomy
/// render as their decimal value.
pub fn name_of(code: i32) -> String {
    match ErrorKind::from_code(code) {
        Some(kind) => kind.name().to_string(),
        None => code.to_string(),
    }
}

/// Typed application error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct AgentMgmtError {
    kind: ErrorKind,
    detail: String,
}

impl AgentMgmtError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn internal_server(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalServer, detail)
    }

    pub fn agent_id_not_found(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::AgentIdNotFound, detail)
    }

    pub fn agent_not_found(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::AgentNotFound, detail)
    }

    pub fn cust_id_invalid(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::CustIdInvalid, detail)
    }

    pub fn counter_not_found(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::CounterNotFound, detail)
    }
}

/// Everything a service operation can fail with: either a typed outcome or
/// a storage fault passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Typed(#[from] AgentMgmtError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Kind of the typed error, `None` for storage faults.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ServiceError::Typed(e) => Some(e.kind()),
            ServiceError::Repository(_) => None,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }
}

/// Reports whether `err`, or any error in its `source()` chain, is a typed
/// error of `kind`. Errors that never wrap one, storage faults included,
/// yield `false`.
pub fn is(err: &(dyn std::error::Error + 'static), kind: ErrorKind) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(typed) = e.downcast_ref::<AgentMgmtError>() {
            return typed.kind() == kind;
        }
        if let Some(service) = e.downcast_ref::<ServiceError>() {
            return service.is(kind);
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorKind::InternalServer.code(), 0);
        assert_eq!(ErrorKind::AgentIdNotFound.code(), 2);
        assert_eq!(ErrorKind::AgentNotFound.code(), 3);
        assert_eq!(ErrorKind::CustIdInvalid.code(), 4);
        assert_eq!(ErrorKind::CounterNotFound.code(), 5);
        assert_eq!(ErrorKind::from_code(1), None);
    }

    #[test]
    fn name_of_falls_back_to_number() {
        assert_eq!(name_of(3), "ErrAgentNotFound");
        assert_eq!(name_of(1), "1");
        assert_eq!(name_of(42), "42");
    }

    #[test]
    fn is_matches_kind_only() {
        let err = AgentMgmtError::agent_not_found("agent 11 not found");
        assert!(is(&err, ErrorKind::AgentNotFound));
        assert!(!is(&err, ErrorKind::AgentIdNotFound));

        let other = AgentMgmtError::agent_not_found("completely different text");
        assert_eq!(err.kind(), other.kind());
    }

    #[test]
    fn is_sees_through_service_error() {
        let err = ServiceError::from(AgentMgmtError::cust_id_invalid("Invalid Cust ID: 0"));
        assert!(is(&err, ErrorKind::CustIdInvalid));

        let storage = ServiceError::from(RepositoryError::Database("connection reset".into()));
        assert!(!is(&storage, ErrorKind::InternalServer));
        assert_eq!(storage.kind(), None);
    }

    #[derive(Debug, thiserror::Error)]
    #[error("call failed: {0}")]
    struct Wrapper(#[source] AgentMgmtError);

    #[test]
    fn is_follows_source_chain() {
        let err = Wrapper(AgentMgmtError::counter_not_found("taskid"));
        assert!(is(&err, ErrorKind::CounterNotFound));
        assert!(!is(&err, ErrorKind::InternalServer));
    }

    #[test]
    fn is_rejects_foreign_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        for kind in ErrorKind::ALL {
            assert!(!is(&io, kind));
        }
    }
}
