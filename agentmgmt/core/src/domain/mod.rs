// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain types: agents, phone sessions, tasks, the typed error taxonomy,
//! repository ports, the injectable clock and service configuration.

pub mod agent;
pub mod clock;
pub mod errors;
pub mod repository;
pub mod service_config;
pub mod session;
pub mod task;
