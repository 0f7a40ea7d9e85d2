// Dashboard state and its update transitions.
// The sync loop owns the only DashboardState and applies events one at a time.

mod buffer;

pub use buffer::{LogFeed, RingBuffer};

use serde::Serialize;

use crate::models::{
    ActionReply, ActivityFeed, CONNECTION_ERROR_REPLY, ChatTurn, ConnectivityStatus,
    CurrentHealth, Feed, HealthReading, HealthSample, IncubatorStatus, LogEntry, TurnId,
    WealthSnapshot,
};

/// Health chart history length.
pub const DEFAULT_HEALTH_CAPACITY: usize = 30;
/// Log feed length.
pub const DEFAULT_LOG_CAPACITY: usize = 16;
/// Open positions shown in the wealth ticker.
pub const TICKER_POSITIONS: usize = 3;

/// Seeded into the log feed when the loop starts, oldest first.
const STARTUP_LOG: [&str; 2] = [
    "[CLAWD] Monitoring research channels...",
    "[SYSTEM] Nexus Upgrade initialized.",
];

/// Everything that can change the dashboard. Timestamps are Unix millis.
#[derive(Debug, Clone)]
pub enum Event {
    LoopStarted { timestamp: u64 },
    IdentityLoaded(String),
    TasksLoaded(String),
    ActivityLoaded(Option<ActivityFeed>),
    TrendsLoaded(Vec<serde_json::Value>),
    IncubatorLoaded(Option<IncubatorStatus>),
    WealthLoaded(WealthSnapshot),
    /// A feed request failed; the feed keeps its prior value.
    FeedFailed(Feed),
    HealthSucceeded { timestamp: u64, reading: HealthReading },
    HealthFailed,
    ActionDispatched { timestamp: u64, name: String },
    ActionCompleted { timestamp: u64, reply: ActionReply },
    ActionFailed { timestamp: u64 },
    ChatSubmitted { id: TurnId, text: String },
    ChatResolved { id: TurnId, reply: String },
    ChatFailed { id: TurnId },
}

/// Returned by [`DashboardState::apply`] when connectivity flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: ConnectivityStatus,
    pub to: ConnectivityStatus,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub identity: String,
    pub tasks: String,
    pub activity: Option<ActivityFeed>,
    pub trends: Vec<serde_json::Value>,
    pub incubator: Option<IncubatorStatus>,
    pub wealth: WealthSnapshot,
    pub status: ConnectivityStatus,
    pub current_health: CurrentHealth,
    pub health: RingBuffer<HealthSample>,
    pub chat: Vec<ChatTurn>,
    pub logs: LogFeed<LogEntry>,
    next_turn_id: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_HEALTH_CAPACITY, DEFAULT_LOG_CAPACITY)
    }
}

impl DashboardState {
    pub fn new(health_capacity: usize, log_capacity: usize) -> Self {
        Self {
            identity: String::new(),
            tasks: String::new(),
            activity: None,
            trends: Vec::new(),
            incubator: None,
            wealth: WealthSnapshot::default(),
            status: ConnectivityStatus::Online,
            current_health: CurrentHealth::default(),
            health: RingBuffer::new(health_capacity),
            chat: Vec::new(),
            logs: LogFeed::new(log_capacity),
            next_turn_id: 1,
        }
    }

    /// Hands out the id for the next chat submission.
    pub fn allocate_turn_id(&mut self) -> TurnId {
        let id = TurnId(self.next_turn_id);
        self.next_turn_id += 1;
        id
    }

    pub fn turn(&self, id: TurnId) -> Option<&ChatTurn> {
        self.chat.iter().find(|t| t.id == id)
    }

    fn log(&mut self, timestamp: u64, message: impl Into<String>) {
        self.logs.prepend(LogEntry::new(timestamp, message));
    }

    fn set_status(&mut self, to: ConnectivityStatus) -> Option<StatusChange> {
        let from = self.status;
        self.status = to;
        (from != to).then_some(StatusChange { from, to })
    }

    /// Completes a pending turn. Unknown ids and already-completed turns are ignored.
    fn complete_turn(&mut self, id: TurnId, reply: String) {
        match self.chat.iter_mut().find(|t| t.id == id) {
            Some(turn) if turn.pending => {
                turn.bot = reply;
                turn.pending = false;
            }
            Some(_) => tracing::debug!(turn = %id, "chat turn already completed; ignoring reply"),
            None => tracing::debug!(turn = %id, "reply for unknown chat turn"),
        }
    }

    pub fn apply(&mut self, event: Event) -> Option<StatusChange> {
        match event {
            Event::LoopStarted { timestamp } => {
                for message in STARTUP_LOG {
                    self.log(timestamp, message);
                }
            }
            Event::IdentityLoaded(text) => self.identity = text,
            Event::TasksLoaded(text) => self.tasks = text,
            Event::ActivityLoaded(feed) => self.activity = feed,
            Event::TrendsLoaded(trends) => self.trends = trends,
            Event::IncubatorLoaded(status) => self.incubator = status,
            Event::WealthLoaded(wealth) => self.wealth = wealth,
            Event::FeedFailed(_) => {}
            Event::HealthSucceeded { timestamp, reading } => {
                let cpu = reading.cpu_percent();
                let ram = reading.ram_percent();
                self.current_health = CurrentHealth { cpu, ram };
                self.health.push(HealthSample {
                    timestamp,
                    cpu_percent: cpu,
                    ram_percent: ram,
                });
                return self.set_status(ConnectivityStatus::Online);
            }
            Event::HealthFailed => return self.set_status(ConnectivityStatus::Offline),
            Event::ActionDispatched { timestamp, name } => {
                self.log(timestamp, format!("[ACTION] Triggering {}...", name));
            }
            Event::ActionCompleted { timestamp, reply } => {
                self.log(timestamp, format!("[SYSTEM] {}", reply.summary()));
            }
            Event::ActionFailed { timestamp } => {
                self.log(timestamp, "[ERROR] Connection failed.");
            }
            Event::ChatSubmitted { id, text } => self.chat.push(ChatTurn::optimistic(id, text)),
            Event::ChatResolved { id, reply } => self.complete_turn(id, reply),
            Event::ChatFailed { id } => self.complete_turn(id, CONNECTION_ERROR_REPLY.to_string()),
        }
        None
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            status: self.status,
            chart_visible: self.status.is_online() && !self.health.is_empty(),
            retry_available: !self.status.is_online(),
            identity: self.identity.clone(),
            tasks: self.tasks.clone(),
            agent_name: self
                .activity
                .as_ref()
                .and_then(|a| a.agent_name())
                .map(str::to_string),
            activity: self.activity.clone(),
            trends: self.trends.clone(),
            incubator: self.incubator.clone(),
            position_labels: self.wealth.position_labels(TICKER_POSITIONS),
            wealth: self.wealth.clone(),
            current_health: self.current_health,
            health: self.health.iter().copied().collect(),
            chat: self.chat.clone(),
            log_lines: self.logs.iter().map(LogEntry::line).collect(),
            logs: self.logs.iter().cloned().collect(),
        }
    }
}

/// Read-only copy of the state handed to the view (JSON, camelCase).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub status: ConnectivityStatus,
    /// Online and at least one sample recorded.
    pub chart_visible: bool,
    /// Offline; the view offers a retry.
    pub retry_available: bool,
    pub identity: String,
    pub tasks: String,
    pub agent_name: Option<String>,
    pub activity: Option<ActivityFeed>,
    pub trends: Vec<serde_json::Value>,
    pub incubator: Option<IncubatorStatus>,
    pub wealth: WealthSnapshot,
    /// Ticker labels for the first few open positions.
    pub position_labels: Vec<String>,
    pub current_health: CurrentHealth,
    /// Oldest first.
    pub health: Vec<HealthSample>,
    pub chat: Vec<ChatTurn>,
    /// Newest first.
    pub logs: Vec<LogEntry>,
    /// `logs` rendered as `[HH:MM:SS] message`, same order.
    pub log_lines: Vec<String>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        DashboardState::default().snapshot()
    }
}
