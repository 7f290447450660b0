// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # agent-mgmt-core
//!
//! Agent availability tracking, reference resolution and task allocation
//! behind a gRPC surface.
//!
//! | Layer | Contents |
//! |-------|----------|
//! | `domain` | entities, error taxonomy, repository traits, configuration |
//! | `application` | directory, resolver, allocators, service facade, decorators |
//! | `infrastructure` | PostgreSQL pool, migrations, repository implementations |
//! | `presentation` | tonic server and the typed-error wire codec |

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
