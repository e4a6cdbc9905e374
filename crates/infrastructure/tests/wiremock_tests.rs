//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Full poll cycle against a mocked departure API
//! - Failure isolation across cycles
//! - Configuration loading into monitors

use std::io::Write;
use std::sync::Arc;

use application::ports::DeparturePort;
use domain::SensorState;
use integration_atb::AtbConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infrastructure::{AppConfig, AtbDepartureAdapter, StateStore, build_monitors, poll_once};

const DEPARTURES: &str = r#"{
    "name": "Prinsens gate P1",
    "departures": [
        { "line": "3", "destination": "Lohove", "registeredDepartureTime": "2021-03-01T08:15:00" },
        { "line": 9, "destination": "Ranheim", "registeredDepartureTime": "2021-03-01T08:20:00" },
        { "line": "3", "destination": "Lohove", "registeredDepartureTime": "2021-03-01T08:30:00" }
    ]
}"#;

fn app_config(server_uri: &str, sensors: &str) -> AppConfig {
    let contents = format!(
        "[atb]\nbase_url = \"{server_uri}\"\ntimeout_secs = 2\n\n{sensors}"
    );
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();
    config.validate().unwrap();
    config
}

fn adapter(config: &AtbConfig) -> Arc<dyn DeparturePort> {
    Arc::new(AtbDepartureAdapter::from_config(config).unwrap())
}

#[tokio::test]
async fn poll_cycle_publishes_summary_and_slots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/16010480/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DEPARTURES))
        .expect(1)
        .mount(&server)
        .await;

    let config = app_config(
        &server.uri(),
        "[sensors.atb_stop]\nstop_id = 16010480\nstop_name = \"Prinsens gate\"\nbus_filter = \"9\"\nall_departures = true\n",
    );
    let store = StateStore::new();
    let mut monitors = build_monitors(&config, &adapter(&config.atb), &store.publisher());
    assert_eq!(monitors.len(), 1);

    poll_once(&mut monitors[0]).await.unwrap();

    let summary = store.get("sensor.atb_stop").unwrap();
    assert_eq!(summary.state.to_string(), "2021-03-01T08:20:00+01:00");
    assert_eq!(summary.name.as_deref(), Some("Prinsens gate"));
    assert_eq!(summary.attributes["name"], "Prinsens gate P1");
    assert!(summary.should_poll);

    let first = store.get("sensor.atb_stop_0").unwrap();
    assert_eq!(first.name.as_deref(), Some("3"));
    assert_eq!(first.state.to_string(), "2021-03-01T08:15:00+01:00");
    assert_eq!(first.attributes["destination"], "Lohove");
    assert!(!first.should_poll);

    let third = store.get("sensor.atb_stop_2").unwrap();
    assert_eq!(third.state.to_string(), "2021-03-01T08:30:00+01:00");

    // Slots beyond the returned departures are never published.
    assert!(store.get("sensor.atb_stop_3").is_none());
    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn failed_cycle_keeps_previous_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DEPARTURES))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = app_config(&server.uri(), "[sensors.atb_stop]\nstop_id = \"16010480\"\n");
    let store = StateStore::new();
    let mut monitors = build_monitors(&config, &adapter(&config.atb), &store.publisher());

    poll_once(&mut monitors[0]).await.unwrap();
    let before = store.get("sensor.atb_stop").unwrap();
    assert_eq!(before.state.to_string(), "2021-03-01T08:15:00+01:00");

    let err = poll_once(&mut monitors[0]).await.unwrap_err();
    assert!(err.contains("Network failure"));
    assert_eq!(store.get("sensor.atb_stop").unwrap(), before);
    assert_eq!(monitors[0].state(), before.state);
}

#[tokio::test]
async fn malformed_body_leaves_state_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let config = app_config(&server.uri(), "[sensors.atb_stop]\nstop_id = 16010480\n");
    let store = StateStore::new();
    let mut monitors = build_monitors(&config, &adapter(&config.atb), &store.publisher());

    let err = poll_once(&mut monitors[0]).await.unwrap_err();
    assert!(err.contains("Malformed response"));
    assert_eq!(monitors[0].state(), SensorState::Unknown);
    assert!(store.is_empty());
}

#[tokio::test]
async fn empty_departure_list_publishes_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{ "departures": [] }"#))
        .mount(&server)
        .await;

    let config = app_config(
        &server.uri(),
        "[sensors.atb_stop]\nstop_id = 16010480\nall_departures = true\n",
    );
    let store = StateStore::new();
    let mut monitors = build_monitors(&config, &adapter(&config.atb), &store.publisher());

    poll_once(&mut monitors[0]).await.unwrap();

    assert_eq!(store.get("sensor.atb_stop").unwrap().state, SensorState::Unknown);
    assert_eq!(store.len(), 1);
}
