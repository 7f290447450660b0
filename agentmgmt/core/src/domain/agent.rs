// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub i32);

impl AgentId {
    /// Zero is never issued to a real agent.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for AgentId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A call-center agent as seen by the availability tracker. Records are
/// provisioned elsewhere; this service only moves `last_heartbeat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: AgentId,
    pub last_heartbeat: DateTime<Utc>,
}

impl Agent {
    pub fn new(agent_id: impl Into<AgentId>, last_heartbeat: DateTime<Utc>) -> Self {
        Self {
            agent_id: agent_id.into(),
            last_heartbeat,
        }
    }

    /// Strictly newer than `since`; a heartbeat landing exactly on the
    /// boundary does not count.
    pub fn heartbeat_after(&self, since: DateTime<Utc>) -> bool {
        self.last_heartbeat > since
    }
}

/// How recent a heartbeat must be for an agent to be offered work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub window: Duration,
    pub default_limit: usize,
}

impl AvailabilityWindow {
    pub const DEFAULT_WINDOW_SECS: i64 = 60;
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn new(window: Duration, default_limit: usize) -> Self {
        Self {
            window,
            default_limit,
        }
    }

    /// Lower (exclusive) heartbeat bound for an availability query at `now`.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    /// Maps the public `limit` onto an effective cap. Zero and negative
    /// values select the default.
    pub fn effective_limit(&self, requested: i32) -> usize {
        if requested <= 0 {
            self.default_limit
        } else {
            requested as usize
        }
    }
}

impl Default for AvailabilityWindow {
    fn default() -> Self {
        Self::new(
            Duration::seconds(Self::DEFAULT_WINDOW_SECS),
            Self::DEFAULT_LIMIT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn boundary_heartbeat_is_excluded() {
        let now = Utc.with_ymd_and_hms(2017, 9, 21, 17, 50, 31).unwrap();
        let window = AvailabilityWindow::default();
        let since = window.since(now);

        assert!(Agent::new(10, now - Duration::seconds(29)).heartbeat_after(since));
        assert!(!Agent::new(11, now - Duration::seconds(60)).heartbeat_after(since));
        assert!(!Agent::new(12, now - Duration::seconds(61)).heartbeat_after(since));
    }

    #[test]
    fn zero_and_negative_limits_use_default() {
        let window = AvailabilityWindow::default();
        assert_eq!(window.effective_limit(0), 10);
        assert_eq!(window.effective_limit(-3), 10);
        assert_eq!(window.effective_limit(4), 4);
    }

    #[test]
    fn zero_agent_id_is_invalid() {
        assert!(!AgentId(0).is_valid());
        assert!(AgentId(10).is_valid());
        assert_eq!(AgentId(10).to_string(), "10");
    }
}
