// HTTP handlers: version, dashboard snapshot, chat and action commands

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::AppState;
use crate::models::ChatRequest;
use crate::version::{NAME, VERSION};

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/dashboard: latest published snapshot.
pub(super) async fn dashboard_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshots.borrow().clone();
    Json(snapshot)
}

/// POST /api/chat: queues a chat turn; the reply shows up in later snapshots.
pub(super) async fn chat_handler(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> impl IntoResponse {
    if body.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "text must be non-empty" })),
        );
    }
    match state.commander.send_chat(body.text).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "queued": true })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, operation = "send_chat", "chat command rejected");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    }
}

/// POST /api/actions/{name}: queues a named action.
pub(super) async fn action_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.commander.trigger_action(name).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "queued": true })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, operation = "trigger_action", "action command rejected");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    }
}
