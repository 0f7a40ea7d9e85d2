// Dashboard domain models (backend payloads and view state pieces)

mod action;
mod chat;
mod feeds;
mod health;

pub use action::{ActionReply, LogEntry};
pub use chat::{BOT_PLACEHOLDER, CONNECTION_ERROR_REPLY, ChatReply, ChatRequest, ChatTurn, TurnId};
pub use feeds::{ActivityFeed, ContentDoc, Feed, IncubatorStatus, Position, WealthSnapshot};
pub use health::{
    CPU_PLACEHOLDER_PERCENT, ConnectivityStatus, CurrentHealth, HealthReading, HealthSample,
};
