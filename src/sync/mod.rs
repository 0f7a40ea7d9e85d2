// Sync loop: one-shot feed fetches at start, a repeating health poll, and
// user commands (chat, actions). Request tasks report back as events; only
// this loop mutates DashboardState, so buffer updates never race.

mod command;
mod requests;

pub use command::{Command, Commander, SyncStopped};

use rand::Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Duration, interval};
use tracing::instrument;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::models::{ConnectivityStatus, Feed};
use crate::state::{DashboardSnapshot, DashboardState, Event, StatusChange};

/// Queued user commands before senders wait.
const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Loop timing and buffer sizes.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub health_interval_ms: u64,
    pub wealth_refresh_probability: f64,
    pub health_capacity: usize,
    pub log_capacity: usize,
}

impl From<&AppConfig> for SyncConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            health_interval_ms: config.polling.health_interval_ms,
            wealth_refresh_probability: config.polling.wealth_refresh_probability,
            health_capacity: config.buffers.health_capacity,
            log_capacity: config.buffers.log_capacity,
        }
    }
}

impl SyncConfig {
    /// Clamps values that would panic the loop: a zero interval and a
    /// refresh probability outside 0..=1 (NaN counts as 0).
    pub fn sanitized(mut self) -> Self {
        if self.health_interval_ms == 0 {
            tracing::warn!(
                operation = "sync_config",
                "health_interval_ms is 0; using 1ms"
            );
            self.health_interval_ms = 1;
        }
        let p = self.wealth_refresh_probability;
        if !(0.0..=1.0).contains(&p) {
            let clamped = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
            tracing::warn!(
                operation = "sync_config",
                probability = p,
                clamped,
                "wealth_refresh_probability out of range"
            );
            self.wealth_refresh_probability = clamped;
        }
        self
    }
}

/// Unix millis; 0 if the clock is before the epoch.
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                operation = "get_timestamp",
                "system time error"
            );
            0
        })
}

/// Owner-side handle of a running loop. Dropping it also stops the loop.
pub struct SyncHandle {
    commander: Commander,
    snapshots: watch::Receiver<DashboardSnapshot>,
    shutdown_tx: oneshot::Sender<()>,
    join: tokio::task::JoinHandle<DashboardState>,
}

impl SyncHandle {
    pub fn commander(&self) -> Commander {
        self.commander.clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.clone()
    }

    /// Cancels the poll timer and returns the final state. Consumes the handle, so it runs once.
    pub async fn shutdown(self) -> anyhow::Result<DashboardState> {
        let _ = self.shutdown_tx.send(());
        self.join
            .await
            .map_err(|e| anyhow::anyhow!("sync loop task join: {}", e))
    }
}

pub fn spawn(api: Arc<ApiClient>, config: SyncConfig) -> SyncHandle {
    let config = config.sanitized();
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let (snapshot_tx, snapshot_rx) = watch::channel(DashboardSnapshot::default());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let join = tokio::spawn(run(api, config, command_rx, snapshot_tx, shutdown_rx));

    SyncHandle {
        commander: Commander::new(command_tx),
        snapshots: snapshot_rx,
        shutdown_tx,
        join,
    }
}

fn log_status_change(change: StatusChange) {
    match change.to {
        ConnectivityStatus::Offline => tracing::warn!(
            from = %change.from,
            to = %change.to,
            "backend unreachable; health poll failing"
        ),
        ConnectivityStatus::Online => tracing::info!(
            from = %change.from,
            to = %change.to,
            "backend reachable again"
        ),
    }
}

#[instrument(
    name = "sync_loop",
    level = "debug",
    skip_all,
    fields(health_interval_ms = config.health_interval_ms)
)]
async fn run(
    api: Arc<ApiClient>,
    config: SyncConfig,
    mut commands: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<DashboardSnapshot>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> DashboardState {
    let mut state = DashboardState::new(config.health_capacity, config.log_capacity);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<Event>();

    state.apply(Event::LoopStarted { timestamp: now_ms() });
    for feed in Feed::ALL {
        requests::spawn_feed(api.clone(), feed, events_tx.clone());
    }
    snapshot_tx.send_replace(state.snapshot());

    // Single-flight guards: a tick never starts a second request to an endpoint
    // that is still outstanding. The startup wealth fetch counts.
    let mut health_in_flight = false;
    let mut wealth_in_flight = true;

    let mut tick = interval(Duration::from_millis(config.health_interval_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::debug!("Sync loop shutting down");
                break;
            }
            _ = tick.tick() => {
                if health_in_flight {
                    tracing::debug!(operation = "get_health", "previous health poll outstanding; skipping tick");
                } else {
                    health_in_flight = true;
                    requests::spawn_health(api.clone(), events_tx.clone());
                }
                let refresh_wealth = rand::thread_rng().gen_bool(config.wealth_refresh_probability);
                if refresh_wealth {
                    if wealth_in_flight {
                        tracing::debug!(operation = "get_wealth", "previous wealth refresh outstanding; skipping");
                    } else {
                        wealth_in_flight = true;
                        requests::spawn_feed(api.clone(), Feed::Wealth, events_tx.clone());
                    }
                }
            }
            Some(command) = commands.recv() => {
                match command {
                    Command::SendChat(text) => {
                        if text.trim().is_empty() {
                            tracing::debug!(operation = "send_chat", "ignoring blank chat message");
                            continue;
                        }
                        let id = state.allocate_turn_id();
                        state.apply(Event::ChatSubmitted { id, text: text.clone() });
                        requests::spawn_chat(api.clone(), id, text, events_tx.clone());
                    }
                    Command::TriggerAction(name) => {
                        state.apply(Event::ActionDispatched { timestamp: now_ms(), name: name.clone() });
                        requests::spawn_action(api.clone(), name, events_tx.clone());
                    }
                }
                snapshot_tx.send_replace(state.snapshot());
            }
            Some(event) = events_rx.recv() => {
                match &event {
                    Event::HealthSucceeded { .. } | Event::HealthFailed => health_in_flight = false,
                    Event::WealthLoaded(_) | Event::FeedFailed(Feed::Wealth) => wealth_in_flight = false,
                    _ => {}
                }
                if let Some(change) = state.apply(event) {
                    log_status_change(change);
                }
                snapshot_tx.send_replace(state.snapshot());
            }
        }
    }

    tracing::info!(
        status = %state.status,
        health_samples = state.health.len(),
        chat_turns = state.chat.len(),
        "sync loop stopped"
    );
    state
}
