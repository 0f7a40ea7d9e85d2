// Shared test helpers: in-process mock backend and snapshot waiting

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use nexus_dashboard::api::ApiClient;
use nexus_dashboard::state::DashboardSnapshot;
use nexus_dashboard::sync::SyncConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tokio::sync::watch;
use tokio::time::Duration;

/// Knobs and counters shared between a test and its mock backend.
#[derive(Default)]
pub struct MockBackend {
    pub health_fail: AtomicBool,
    pub health_delay_ms: AtomicU64,
    pub health_calls: AtomicUsize,
    pub health_active: AtomicUsize,
    /// Highest number of health requests seen in progress at once.
    pub health_max_concurrent: AtomicUsize,
    pub wealth_calls: AtomicUsize,
    pub identity_fail: AtomicBool,
}

pub struct MockServer {
    pub base_url: String,
    pub backend: Arc<MockBackend>,
}

async fn identity(State(b): State<Arc<MockBackend>>) -> impl IntoResponse {
    if b.identity_fail.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({})));
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({ "content": "# Clawdbot\nAutonomous agent." })),
    )
}

async fn health(State(b): State<Arc<MockBackend>>) -> impl IntoResponse {
    b.health_calls.fetch_add(1, Ordering::SeqCst);
    let active = b.health_active.fetch_add(1, Ordering::SeqCst) + 1;
    b.health_max_concurrent.fetch_max(active, Ordering::SeqCst);
    let delay = b.health_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    b.health_active.fetch_sub(1, Ordering::SeqCst);
    if b.health_fail.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "down" })),
        );
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "cpu": 42.5,
            "ram": 61.0,
            "is_online": true,
            "timestamp": "2026-10-18T12:00:00"
        })),
    )
}

async fn wealth(State(b): State<Arc<MockBackend>>) -> impl IntoResponse {
    let n = b.wealth_calls.fetch_add(1, Ordering::SeqCst) + 1;
    Json(serde_json::json!({
        "balance": 1000.0 + n as f64,
        "active_positions": [{ "title": "Solar Microgrid Fund", "roi": 4.5 }],
        "history": []
    }))
}

async fn chat(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    let text = body
        .get("text")
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string();
    if text == "slow" {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    Json(serde_json::json!({ "response": format!("pong: {}", text) }))
}

async fn action(Path(name): Path<String>) -> impl IntoResponse {
    match name.as_str() {
        "sync" => Json(serde_json::json!({ "status": "ok" })),
        _ => Json(serde_json::json!({ "error": "Unknown action" })),
    }
}

pub fn mock_router(backend: Arc<MockBackend>) -> Router {
    Router::new()
        .route("/api/identity", get(identity))
        .route(
            "/api/tasks",
            get(|| async { Json(serde_json::json!({ "content": "- [ ] ship it" })) }),
        )
        .route(
            "/api/moltbook/activity",
            get(|| async { Json(serde_json::json!({ "agent": { "name": "Nexara" } })) }),
        )
        .route(
            "/api/forge/trends",
            get(|| async { Json(serde_json::json!({ "not": "an array" })) }),
        )
        .route(
            "/api/forge/status",
            get(|| async {
                Json(serde_json::json!({
                    "current_project": "MicroSaaS",
                    "status": "Incubating",
                    "path": "/forge/microsaas"
                }))
            }),
        )
        .route("/api/wealth", get(wealth))
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/actions/{name}", post(action))
        .with_state(backend)
}

/// Serves the mock backend on an ephemeral loopback port.
pub async fn start_mock() -> MockServer {
    let backend = Arc::new(MockBackend::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = mock_router(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    MockServer {
        base_url: format!("http://{}/api", addr),
        backend,
    }
}

/// Base URL of a port nothing listens on (bound, then released).
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

pub fn client(base_url: &str) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(base_url, Duration::from_secs(2)).unwrap())
}

pub fn fast_sync_config(health_interval_ms: u64, wealth_refresh_probability: f64) -> SyncConfig {
    SyncConfig {
        health_interval_ms,
        wealth_refresh_probability,
        health_capacity: 30,
        log_capacity: 16,
    }
}

/// Waits (up to 3s) for a snapshot matching `pred` and returns a copy.
pub async fn wait_for_snapshot(
    rx: &mut watch::Receiver<DashboardSnapshot>,
    pred: impl FnMut(&DashboardSnapshot) -> bool,
) -> DashboardSnapshot {
    tokio::time::timeout(Duration::from_secs(3), rx.wait_for(pred))
        .await
        .expect("timed out waiting for snapshot")
        .expect("sync loop stopped")
        .clone()
}
