// WebSocket handler: pushes a snapshot on every state change

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use tokio::sync::watch;
use tokio::time::{Duration, Instant, interval_at, timeout};

use super::AppState;
use crate::state::DashboardSnapshot;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rx = state.snapshots.clone();
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_dashboard(socket, rx).await {
            tracing::info!("Dashboard stream error: {}", e);
        }
    })
}

/// Returns false when the client is too slow or gone.
async fn send_within_timeout(socket: &mut WebSocket, message: Message) -> bool {
    matches!(timeout(WS_SEND_TIMEOUT, socket.send(message)).await, Ok(Ok(())))
}

async fn stream_dashboard(
    mut socket: WebSocket,
    mut rx: watch::Receiver<DashboardSnapshot>,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to dashboard stream");

    let initial = serde_json::to_string(&*rx.borrow_and_update())?;
    if !send_within_timeout(&mut socket, Message::Text(initial.into())).await {
        return Ok(());
    }

    let mut ping_interval = interval_at(Instant::now() + WS_PING_INTERVAL, WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    // Sync loop stopped; no more snapshots will come.
                    break;
                }
                let json = serde_json::to_string(&*rx.borrow_and_update())?;
                if !send_within_timeout(&mut socket, Message::Text(json.into())).await {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                if !send_within_timeout(&mut socket, Message::Ping(Bytes::new())).await {
                    break;
                }
            }
        }
    }
    Ok(())
}
