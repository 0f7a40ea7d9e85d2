// Named one-shot actions and their log entries

use serde::{Deserialize, Serialize};

/// Backend reply to POST /api/actions/{name}: `{status}` on success, `{error}` otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionReply {
    pub status: Option<String>,
    pub error: Option<String>,
}

impl ActionReply {
    /// Status text, else error text. Empty strings count as absent.
    pub fn summary(&self) -> &str {
        let present = |s: &&str| !s.is_empty();
        self.status
            .as_deref()
            .filter(present)
            .or(self.error.as_deref().filter(present))
            .unwrap_or("no response")
    }
}

/// One line of the scrolling dashboard log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Unix millis.
    pub timestamp: u64,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: u64, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// `[HH:MM:SS] message` in local time.
    pub fn line(&self) -> String {
        let time = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.timestamp as i64)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "--:--:--".into());
        format!("[{}] {}", time, self.message)
    }
}
