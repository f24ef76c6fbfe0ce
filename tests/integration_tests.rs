//! Setup, poll cycles and teardown of a whole integration instance.
//!
//! # Invariants
//! - Setup fails when the first refresh fails
//! - A failed cycle never overwrites the committed snapshot
//! - Poll cycles never overlap
//! - The polling loop waits one full interval before its first cycle
//! - Rejected credentials stop the polling loop
//! - Unloading stops all further polling

mod common;

use std::time::Duration;

use common::*;
use heizoel24_mex::{
    coordinator::Coordinator, error::MexError, integration::Integration, sensors::MexField,
    snapshot::SnapshotStore,
};
use serde_json::json;
use tokio::time::timeout;

const TWELVE_HOURS: Duration = Duration::from_secs(12 * 60 * 60);

#[tokio::test]
async fn setup_fails_when_first_refresh_is_rejected() {
    let server = MockServer::start().await;
    login_rejected().mount(&server).await;

    let result = Integration::setup_with(client_for(&server), TWELVE_HOURS).await;

    assert!(matches!(result, Err(MexError::Authentication)));
}

#[tokio::test]
async fn setup_fails_when_api_unreachable() {
    let client = client_with_urls(UNREACHABLE, UNREACHABLE, None);

    let result = Integration::setup_with(client, TWELVE_HOURS).await;

    assert!(matches!(result, Err(MexError::Connectivity(_))));
}

#[tokio::test]
async fn setup_exposes_derived_sensor_values() {
    let server = MockServer::start().await;
    login_ok().mount(&server).await;
    dashboard_ok().mount(&server).await;

    let integration = Integration::setup_with(client_for(&server), TWELVE_HOURS)
        .await
        .unwrap();

    assert_eq!(
        integration.state(MexField::MaxVolume).await.value,
        Some(json!(700))
    );
    assert_eq!(
        integration.state(MexField::LastOrderPrice).await.value,
        Some(json!(12.34))
    );

    let sensor_id = integration.state(MexField::SensorId).await;
    assert_eq!(sensor_id.value, Some(json!("MEX-0042")));
    assert_eq!(
        sensor_id.attributes.map(serde_json::Value::Object),
        Some(sensor_item())
    );

    let status = integration.status().await;
    assert!(status.last_update_success);
    assert!(status.last_success.is_some());

    assert_eq!(integration.states().await.len(), 8);
    integration.unload().await;
}

#[tokio::test]
async fn failed_auth_cycle_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    // First login succeeds, every later one is rejected.
    login_ok().up_to_n_times(1).mount(&server).await;
    login_rejected().mount(&server).await;
    dashboard_ok().expect(1).mount(&server).await;

    let integration = Integration::setup_with(client_for(&server), TWELVE_HOURS)
        .await
        .unwrap();
    let before = integration.coordinator().store().latest().await.unwrap();

    let err = integration.coordinator().refresh().await.unwrap_err();
    assert!(err.is_auth_failure());

    let after = integration.coordinator().store().latest().await.unwrap();
    assert_eq!(before, after);
    assert_eq!(integration.coordinator().store().generation(), 1);

    let status = integration.status().await;
    assert!(!status.last_update_success);
    assert_eq!(status.failure_kind, Some("authentication"));
    assert_eq!(status.last_success, Some(before.fetched_at));

    integration.unload().await;
}

#[tokio::test]
async fn subscribers_see_each_committed_snapshot() {
    let server = MockServer::start().await;
    login_ok().mount(&server).await;
    dashboard_ok().mount(&server).await;

    let integration = Integration::setup_with(client_for(&server), TWELVE_HOURS)
        .await
        .unwrap();
    let mut rx = integration.subscribe();
    assert_eq!(*rx.borrow_and_update(), 1);

    integration.coordinator().refresh().await.unwrap();

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 2);
    integration.unload().await;
}

#[tokio::test]
async fn polling_loop_waits_a_full_interval() {
    let server = MockServer::start().await;
    login_ok().mount(&server).await;
    dashboard_ok().mount(&server).await;

    let integration = Integration::setup_with(client_for(&server), Duration::from_secs(3600))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(requests_to(&server, LOGIN_PATH).await, 1);
    assert_eq!(requests_to(&server, DATA_PATH).await, 1);
    integration.unload().await;
}

#[tokio::test]
async fn concurrent_refreshes_run_one_after_another() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{SESSION_COOKIE}; Path=/").as_str())
                .set_body_json(json!({ "Success": true }))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;
    dashboard_ok().expect(2).mount(&server).await;

    let coordinator = Coordinator::new(client_for(&server), SnapshotStore::new(), TWELVE_HOURS);
    let (first, second) = tokio::join!(coordinator.refresh(), coordinator.refresh());
    first.unwrap();
    second.unwrap();

    let order: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_owned())
        .collect();
    assert_eq!(order, [LOGIN_PATH, DATA_PATH, LOGIN_PATH, DATA_PATH]);
    assert_eq!(coordinator.store().generation(), 2);
}

#[tokio::test]
async fn rejected_credentials_stop_polling() {
    let server = MockServer::start().await;
    login_ok().up_to_n_times(1).mount(&server).await;
    login_rejected().mount(&server).await;
    dashboard_ok().mount(&server).await;

    let integration = Integration::setup_with(client_for(&server), Duration::from_millis(50))
        .await
        .unwrap();

    timeout(Duration::from_secs(5), async {
        while integration.is_polling() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("polling loop should stop after an authentication failure");

    assert_eq!(requests_to(&server, LOGIN_PATH).await, 2);
    assert_eq!(requests_to(&server, DATA_PATH).await, 1);

    let status = integration.status().await;
    assert!(!status.last_update_success);
    assert_eq!(status.failure_kind, Some("authentication"));
    assert_eq!(
        integration.state(MexField::SensorId).await.value,
        Some(json!("MEX-0042"))
    );

    integration.unload().await;
}

#[tokio::test]
async fn unload_stops_polling() {
    let server = MockServer::start().await;
    login_ok().mount(&server).await;
    dashboard_ok().mount(&server).await;

    let integration = Integration::setup_with(client_for(&server), Duration::from_millis(20))
        .await
        .unwrap();
    let mut rx = integration.subscribe();

    // Wait for two scheduled cycles on top of the one from setup.
    timeout(Duration::from_secs(5), rx.wait_for(|generation| *generation >= 3))
        .await
        .expect("scheduled polls should commit snapshots")
        .unwrap();
    assert!(integration.is_polling());

    integration.unload().await;
    let generation = *rx.borrow_and_update();

    // Every handle that could commit a snapshot is gone once unload returns.
    assert!(rx.changed().await.is_err());
    assert_eq!(*rx.borrow(), generation);
}
