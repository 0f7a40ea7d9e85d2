// Chat transcript models

use serde::{Deserialize, Serialize};

/// Bot text shown while a reply is outstanding.
pub const BOT_PLACEHOLDER: &str = "...";

/// Bot text substituted when the chat request fails.
pub const CONNECTION_ERROR_REPLY: &str = "Connection error.";

/// Identifies a chat turn from submission until its reply lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub id: TurnId,
    pub user: String,
    pub bot: String,
    /// True until the reply (or the connection error) has been filled in.
    pub pending: bool,
}

impl ChatTurn {
    pub fn optimistic(id: TurnId, user: impl Into<String>) -> Self {
        Self {
            id,
            user: user.into(),
            bot: BOT_PLACEHOLDER.to_string(),
            pending: true,
        }
    }
}

/// Body of POST /api/chat (backend and view server).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Backend reply to POST /api/chat.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    pub response: Option<String>,
}

impl ChatReply {
    pub fn into_text(self) -> String {
        self.response.unwrap_or_default()
    }
}
