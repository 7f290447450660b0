// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Sequence Allocator
//!
//! Hands out values from named counters. The increment happens inside a
//! single repository call, so two allocators racing on the same name can
//! never observe the same value. Counters are provisioned ahead of time
//! (see [`crate::application::repository_factory::prepare`]); asking for
//! one that does not exist is a typed `CounterNotFound`, and nothing is
//! created as a side effect.

use std::sync::Arc;
use tracing::debug;

use crate::domain::errors::{AgentMgmtError, ServiceError};
use crate::domain::repository::CounterRepository;

pub struct SequenceAllocator {
    counters: Arc<dyn CounterRepository>,
}

impl SequenceAllocator {
    pub fn new(counters: Arc<dyn CounterRepository>) -> Self {
        Self { counters }
    }

    pub async fn next_sequence(&self, name: &str) -> Result<i32, ServiceError> {
        if name.is_empty() {
            return Err(AgentMgmtError::counter_not_found("counter name is empty").into());
        }

        match self.counters.increment(name).await? {
            Some(seq) => {
                debug!(counter = name, seq, "Allocated sequence value");
                Ok(seq)
            }
            None => Err(AgentMgmtError::counter_not_found(format!(
                "counter '{}' does not exist",
                name
            ))
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use crate::infrastructure::repositories::InMemoryCounterRepository;

    #[tokio::test]
    async fn increments_from_seed() {
        let counters = Arc::new(InMemoryCounterRepository::new());
        counters.create("taskid", 1).await.unwrap();
        let seq = SequenceAllocator::new(counters);

        assert_eq!(seq.next_sequence("taskid").await.unwrap(), 2);
        assert_eq!(seq.next_sequence("taskid").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn missing_counter_is_typed_and_not_created() {
        let counters = Arc::new(InMemoryCounterRepository::new());
        let seq = SequenceAllocator::new(counters.clone());

        let err = seq.next_sequence("nonexistent").await.unwrap_err();
        assert!(err.is(ErrorKind::CounterNotFound));
        assert!(!counters.contains("nonexistent"));
    }

    #[tokio::test]
    async fn empty_name_is_counter_not_found() {
        let seq = SequenceAllocator::new(Arc::new(InMemoryCounterRepository::new()));
        let err = seq.next_sequence("").await.unwrap_err();
        assert!(err.is(ErrorKind::CounterNotFound));
    }
}
