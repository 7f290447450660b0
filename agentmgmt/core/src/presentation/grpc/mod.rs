// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod error_codec;
pub mod server;

/// Generated protobuf code
pub mod proto {
    tonic::include_proto!("agentmgmt.v1");
}
