// View server: dashboard snapshot over HTTP + WebSocket, chat/action commands in

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use crate::state::DashboardSnapshot;
use crate::sync::Commander;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshots: watch::Receiver<DashboardSnapshot>,
    pub(crate) commander: Commander,
}

pub fn app(snapshots: watch::Receiver<DashboardSnapshot>, commander: Commander) -> Router {
    let state = AppState {
        snapshots,
        commander,
    };
    Router::new()
        .route("/", get(|| async { "Nexus dashboard: sync loop running" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/dashboard", get(http::dashboard_handler)) // GET /api/dashboard
        .route("/api/chat", post(http::chat_handler)) // POST /api/chat
        .route("/api/actions/{name}", post(http::action_handler)) // POST /api/actions/{name}
        .route("/ws/dashboard", get(ws::ws_dashboard)) // WS /ws/dashboard
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
