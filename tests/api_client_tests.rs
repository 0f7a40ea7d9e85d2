// API client against the in-process mock backend

mod common;

use nexus_dashboard::api::{ApiClient, ApiError};
use std::sync::atomic::Ordering;
use tokio::time::Duration;

#[tokio::test]
async fn test_fetches_feeds() {
    let mock = common::start_mock().await;
    let api = common::client(&mock.base_url);

    assert!(api.get_identity().await.unwrap().starts_with("# Clawdbot"));
    assert_eq!(api.get_tasks().await.unwrap(), "- [ ] ship it");
    let activity = api.get_activity().await.unwrap().expect("activity");
    assert_eq!(activity.agent_name(), Some("Nexara"));
    let incubator = api.get_incubator_status().await.unwrap().expect("status");
    assert_eq!(incubator.status.as_deref(), Some("Incubating"));
    let wealth = api.get_wealth().await.unwrap();
    assert_eq!(wealth.balance, 1001.0);
    assert_eq!(wealth.active_positions.len(), 1);
}

#[tokio::test]
async fn test_non_array_trends_become_empty() {
    let mock = common::start_mock().await;
    let api = common::client(&mock.base_url);
    assert!(api.get_trends().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_reading_and_status_error() {
    let mock = common::start_mock().await;
    let api = common::client(&mock.base_url);

    let reading = api.get_health().await.unwrap();
    assert_eq!(reading.cpu_percent(), 42.5);
    assert_eq!(reading.ram_percent(), 61.0);

    mock.backend.health_fail.store(true, Ordering::SeqCst);
    match api.get_health().await {
        Err(ApiError::Status { endpoint, status }) => {
            assert_eq!(status, 503);
            assert!(endpoint.ends_with("/api/health"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_action_and_chat_round_trip() {
    let mock = common::start_mock().await;
    let api = common::client(&mock.base_url);

    assert_eq!(api.trigger_action("sync").await.unwrap().summary(), "ok");
    assert_eq!(
        api.trigger_action("teleport").await.unwrap().summary(),
        "Unknown action"
    );
    assert_eq!(api.send_chat("ping").await.unwrap().into_text(), "pong: ping");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let api = common::client(&common::dead_base_url().await);
    assert!(matches!(
        api.get_health().await,
        Err(ApiError::Transport(_))
    ));
}

#[tokio::test]
async fn test_request_timeout_is_a_failure() {
    let mock = common::start_mock().await;
    mock.backend.health_delay_ms.store(500, Ordering::SeqCst);
    let api = ApiClient::new(&mock.base_url, Duration::from_millis(50)).unwrap();
    assert!(api.get_health().await.is_err());
}

#[test]
fn test_invalid_base_url_rejected() {
    let err = ApiClient::new("not a url", Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    let err = ApiClient::new("mailto:bot@example.com", Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
}

#[test]
fn test_base_url_keeps_api_prefix() {
    let api = ApiClient::new("http://127.0.0.1:8001/api", Duration::from_secs(1)).unwrap();
    assert_eq!(api.base_url(), "http://127.0.0.1:8001/api");
}
