// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use agent_mgmt_core::application::repository_factory::{create_decorated_service, prepare, Repositories};
use agent_mgmt_core::domain::agent::{Agent, AvailabilityWindow};
use agent_mgmt_core::domain::clock::ManualClock;
use agent_mgmt_core::domain::errors::{is, ErrorKind};
use agent_mgmt_core::domain::repository::{AgentRepository, PhoneSessionRepository};
use agent_mgmt_core::domain::session::PhoneSession;
use agent_mgmt_core::presentation::grpc::error_codec::{unwrap_error, ClientError, ERROR_TYPE_KEY};
use agent_mgmt_core::presentation::grpc::proto::agent_mgmt_client::AgentMgmtClient;
use agent_mgmt_core::presentation::grpc::proto::heart_beat_response::HeartBeatStatus;
use agent_mgmt_core::presentation::grpc::proto::*;
use agent_mgmt_core::presentation::grpc::server::serve_on_listener;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::transport::Channel;
use tonic::Code;

struct Harness {
    client: AgentMgmtClient<Channel>,
    clock: Arc<ManualClock>,
    _shutdown: oneshot::Sender<()>,
}

async fn start(repos: Repositories) -> Harness {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2017, 9, 21, 17, 50, 31).unwrap(),
    ));
    let service = create_decorated_service(&repos, clock.clone(), AvailabilityWindow::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(serve_on_listener(
        listener,
        service,
        std::time::Duration::from_secs(5),
        async {
            let _ = rx.await;
        },
    ));

    let client = AgentMgmtClient::connect(format!("http://{}", addr))
        .await
        .unwrap();
    Harness {
        client,
        clock,
        _shutdown: tx,
    }
}

async fn prepared() -> Repositories {
    let repos = Repositories::in_memory();
    prepare(&repos).await.unwrap();
    repos
}

#[tokio::test]
async fn heartbeat_makes_agent_available_until_expiry() {
    let repos = prepared().await;
    repos
        .agents
        .save(&Agent::new(10, Utc.with_ymd_and_hms(2017, 9, 21, 16, 0, 0).unwrap()))
        .await
        .unwrap();
    let mut h = start(repos).await;

    let beat = h
        .client
        .heart_beat(HeartBeatRequest { agent_id: 10 })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(beat.status(), HeartBeatStatus::Successful);

    let listed = h
        .client
        .get_available_agents(GetAvailableAgentsRequest { limit: 0 })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(listed.agent_ids, vec!["10".to_string()]);

    h.clock.advance(Duration::seconds(61));
    let listed = h
        .client
        .get_available_agents(GetAvailableAgentsRequest { limit: 0 })
        .await
        .unwrap()
        .into_inner();
    assert!(listed.agent_ids.is_empty());
}

#[tokio::test]
async fn typed_errors_survive_the_wire() {
    let repos = prepared().await;
    repos
        .sessions
        .save(&PhoneSession::new(1, 10, "CA1234"))
        .await
        .unwrap();
    let mut h = start(repos).await;

    let resolved = h
        .client
        .get_agent_id_from_ref(GetAgentIdFromRefRequest {
            ref_id: "CA1234".into(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(resolved.agent_id, 10);

    let status = h
        .client
        .get_agent_id_from_ref(GetAgentIdFromRefRequest {
            ref_id: "doesnotexist".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unknown);
    assert_eq!(
        status.metadata().get(ERROR_TYPE_KEY).unwrap().to_str().unwrap(),
        "2"
    );
    match unwrap_error(status) {
        ClientError::Service(e) => assert!(is(&e, ErrorKind::AgentIdNotFound)),
        other => panic!("expected typed error, got {:?}", other),
    }

    let status = h
        .client
        .heart_beat(HeartBeatRequest { agent_id: 13 })
        .await
        .unwrap_err();
    assert!(unwrap_error(status).is(ErrorKind::AgentNotFound));

    let status = h
        .client
        .add_task(AddTaskRequest {
            cust_id: 0,
            call_ids: vec![1, 2, 3],
        })
        .await
        .unwrap_err();
    assert!(unwrap_error(status).is(ErrorKind::CustIdInvalid));
}

#[tokio::test]
async fn add_task_allocates_sequential_ids() {
    let mut h = start(prepared().await).await;

    for expected in 2..=4 {
        let added = h
            .client
            .add_task(AddTaskRequest {
                cust_id: 1,
                call_ids: vec![10, 11],
            })
            .await
            .unwrap()
            .into_inner();
        assert_eq!(added.task_id, expected);
    }
}

#[tokio::test]
async fn unseeded_counter_reports_counter_not_found() {
    let mut h = start(Repositories::in_memory()).await;

    let status = h
        .client
        .add_task(AddTaskRequest {
            cust_id: 1,
            call_ids: vec![],
        })
        .await
        .unwrap_err();
    assert!(unwrap_error(status).is(ErrorKind::CounterNotFound));
}
