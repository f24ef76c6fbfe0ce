//! Shared helpers for tests that run against a mocked Heizöl24 API.
//!
//! Every test starts its own `MockServer` on a random port, so tests can run
//! in parallel without sharing state.

// Not every test file uses every helper.
#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::{json, Value};

use heizoel24_mex::{config::Credentials, mex::MexClient};

pub use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const LOGIN_PATH: &str = "/app/api/app/Login";
pub const DATA_PATH: &str = "/app/api/app/GetDashboardData/1/1/1/0/0/0";
pub const SESSION_COOKIE: &str = "MexSession=abc123";

/// Loopback port nobody listens on; connecting fails immediately.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn client_for(server: &MockServer) -> MexClient {
    client_with_urls(
        &format!("{}{LOGIN_PATH}", server.uri()),
        &format!("{}{DATA_PATH}", server.uri()),
        None,
    )
}

pub fn client_with_urls(login_url: &str, data_url: &str, dump_dir: Option<PathBuf>) -> MexClient {
    MexClient::from_parts(
        Credentials::new("tank@example.com", "s3cret"),
        login_url,
        data_url,
        dump_dir,
    )
}

pub fn expected_login_body() -> Value {
    json!({ "Login": { "UserName": "tank@example.com", "Password": "s3cret" } })
}

pub fn sensor_item() -> Value {
    json!({
        "SensorId": "MEX-0042",
        "MaxVolume": 1000,
        "CurrentVolume": 300,
        "CurrentVolumePercentage": 30,
        "Usage": 4.75,
        "LastOrderPrice": 1234,
        "RemainingDays": 63,
        "BatteryPercentage": 88,
        "LastMeasurementTimeStamp": "2024-03-01T06:00:00"
    })
}

pub fn dashboard_body() -> Value {
    json!({
        "Items": [sensor_item()],
        "ResultCode": 0
    })
}

/// Login that succeeds and hands out the session cookie.
pub fn login_ok() -> Mock {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_json(expected_login_body()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{SESSION_COOKIE}; Path=/").as_str())
                .set_body_json(json!({ "Success": true })),
        )
}

pub fn login_rejected() -> Mock {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Success": false, "Message": "Login failed" })),
        )
}

/// Dashboard read that only answers when the session cookie is present.
pub fn dashboard_ok() -> Mock {
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(dashboard_body()))
}

pub async fn requests_to(server: &MockServer, p: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == p)
        .count()
}
