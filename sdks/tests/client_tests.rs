// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use agent_mgmt_core::application::repository_factory::{create_decorated_service, prepare, Repositories};
use agent_mgmt_core::domain::agent::{Agent, AvailabilityWindow};
use agent_mgmt_core::domain::clock::SystemClock;
use agent_mgmt_core::domain::repository::AgentRepository;
use agent_mgmt_core::presentation::grpc::server::serve_on_listener;
use agent_mgmt_sdk::{is, AgentId, AgentMgmtClient, ClientError, CustId, ErrorKind, HeartBeatStatus, TaskId};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

async fn serve(repos: Repositories) -> String {
    let service = create_decorated_service(&repos, Arc::new(SystemClock), AvailabilityWindow::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_on_listener(
        listener,
        service,
        Duration::from_secs(5),
        std::future::pending::<()>(),
    ));
    format!("http://{}", addr)
}

#[tokio::test]
async fn client_round_trip() {
    let repos = Repositories::in_memory();
    prepare(&repos).await.unwrap();
    repos
        .agents
        .save(&Agent::new(10, chrono::Utc::now()))
        .await
        .unwrap();
    let mut client = AgentMgmtClient::connect(serve(repos).await).await.unwrap();

    assert_eq!(client.heart_beat(AgentId(10)).await.unwrap(), HeartBeatStatus::Successful);
    assert_eq!(client.get_available_agents(0).await.unwrap(), vec!["10".to_string()]);
    assert_eq!(
        client.add_task(CustId(5), &[AgentId(10)]).await.unwrap(),
        TaskId(2)
    );
}

#[tokio::test]
async fn client_decodes_typed_errors() {
    let repos = Repositories::in_memory();
    prepare(&repos).await.unwrap();
    let mut client = AgentMgmtClient::connect(serve(repos).await).await.unwrap();

    match client.get_agent_id_from_ref("doesnotexist").await {
        Err(ClientError::Service(e)) => assert!(is(&e, ErrorKind::AgentIdNotFound)),
        other => panic!("expected typed error, got {:?}", other),
    }

    let err = client.heart_beat(AgentId(99)).await.unwrap_err();
    assert!(err.is(ErrorKind::AgentNotFound));

    let err = client.add_task(CustId(-1), &[]).await.unwrap_err();
    assert!(err.is(ErrorKind::CustIdInvalid));
}
