// Integration tests: view server HTTP and WebSocket endpoints

use axum_test::TestServer;
use nexus_dashboard::models::HealthReading;
use nexus_dashboard::routes;
use nexus_dashboard::state::{DashboardSnapshot, DashboardState, Event};
use nexus_dashboard::sync::{Command, Commander};
use tokio::sync::{mpsc, watch};

struct Harness {
    snapshot_tx: watch::Sender<DashboardSnapshot>,
    commands: mpsc::Receiver<Command>,
}

fn test_app() -> (axum::Router, Harness) {
    let (snapshot_tx, snapshot_rx) = watch::channel(DashboardSnapshot::default());
    let (command_tx, commands) = mpsc::channel(8);
    let app = routes::app(snapshot_rx, Commander::new(command_tx));
    (
        app,
        Harness {
            snapshot_tx,
            commands,
        },
    )
}

fn online_snapshot() -> DashboardSnapshot {
    let mut state = DashboardState::default();
    state.apply(Event::IdentityLoaded("# Nexus".into()));
    state.apply(Event::HealthSucceeded {
        timestamp: 42,
        reading: HealthReading {
            cpu: Some(12.0),
            ram: Some(34.0),
        },
    });
    state.snapshot()
}

#[tokio::test]
async fn test_root_endpoint() {
    let (app, _h) = test_app();
    let server = TestServer::new(app).unwrap();
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("Nexus dashboard: sync loop running");
}

#[tokio::test]
async fn test_version_endpoint() {
    let (app, _h) = test_app();
    let server = TestServer::new(app).unwrap();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("nexus-dashboard")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_dashboard_endpoint_returns_latest_snapshot() {
    let (app, h) = test_app();
    let server = TestServer::new(app).unwrap();

    let json: serde_json::Value = server.get("/api/dashboard").await.json();
    assert_eq!(json["status"], "online");
    assert_eq!(json["chartVisible"], false);

    h.snapshot_tx.send_replace(online_snapshot());
    let json: serde_json::Value = server.get("/api/dashboard").await.json();
    assert_eq!(json["identity"], "# Nexus");
    assert_eq!(json["chartVisible"], true);
    assert_eq!(json["currentHealth"]["ram"], 34.0);
    assert_eq!(json["health"][0]["cpuPercent"], 12.0);
    assert_eq!(json["positionLabels"], serde_json::json!([]));
    assert_eq!(json["logLines"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_chat_endpoint_queues_command() {
    let (app, mut h) = test_app();
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/api/chat")
        .json(&serde_json::json!({ "text": "ping" }))
        .await;
    response.assert_status(axum::http::StatusCode::ACCEPTED);
    assert_eq!(h.commands.recv().await, Some(Command::SendChat("ping".into())));
}

#[tokio::test]
async fn test_chat_endpoint_rejects_blank_text() {
    let (app, mut h) = test_app();
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/api/chat")
        .json(&serde_json::json!({ "text": "  " }))
        .await;
    response.assert_status_bad_request();
    assert!(h.commands.try_recv().is_err());
}

#[tokio::test]
async fn test_action_endpoint_queues_command() {
    let (app, mut h) = test_app();
    let server = TestServer::new(app).unwrap();

    let response = server.post("/api/actions/forge").await;
    response.assert_status(axum::http::StatusCode::ACCEPTED);
    assert_eq!(
        h.commands.recv().await,
        Some(Command::TriggerAction("forge".into()))
    );
}

#[tokio::test]
async fn test_commands_rejected_when_sync_loop_gone() {
    let (app, h) = test_app();
    drop(h);
    let server = TestServer::new(app).unwrap();
    let response = server.post("/api/actions/sync").await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

// --- WebSocket tests (require http_transport + ws feature) ---

#[tokio::test]
async fn test_ws_dashboard_sends_current_then_updates() {
    let (app, h) = test_app();
    let server = TestServer::builder().http_transport().build(app).unwrap();
    let mut ws = server
        .get_websocket("/ws/dashboard")
        .await
        .into_websocket()
        .await;

    let first: serde_json::Value = serde_json::from_str(&ws.receive_text().await).unwrap();
    assert_eq!(first["status"], "online");
    assert_eq!(first["identity"], "");

    h.snapshot_tx.send_replace(online_snapshot());
    let next: serde_json::Value = serde_json::from_str(&ws.receive_text().await).unwrap();
    assert_eq!(next["identity"], "# Nexus");
    assert_eq!(next["health"][0]["timestamp"], 42);
}
