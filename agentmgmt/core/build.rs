// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Build Script for agent-mgmt-core
//!
//! Compiles `../../proto/agent_mgmt.proto` into the gRPC server and client
//! stubs used by `src/presentation/grpc`. Generated code is placed in
//! `OUT_DIR` and included via `tonic::include_proto!`.
//!
//! `protoc` is vendored through `protoc-bin-vendored` so the build does not
//! depend on a system installation.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../../proto/agent_mgmt.proto"], &["../../proto"])?;

    println!("cargo:rerun-if-changed=../../proto/agent_mgmt.proto");

    Ok(())
}
