// One-shot dashboard feeds: identity/tasks documents, activity, trends, incubator, wealth.
// Every field defaults so partial or null payloads never fail a whole fetch.

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `{content}` body of GET /api/identity and GET /api/tasks (markdown text).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDoc {
    pub content: Option<String>,
}

impl ContentDoc {
    pub fn into_text(self) -> String {
        self.content.unwrap_or_default()
    }
}

/// Opaque activity object from GET /api/moltbook/activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityFeed(pub serde_json::Value);

impl ActivityFeed {
    /// `agent.name`, when the feed carries one.
    pub fn agent_name(&self) -> Option<&str> {
        self.0
            .get("agent")
            .and_then(|a| a.get("name"))
            .and_then(|n| n.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// GET /api/forge/status. Reads snake_case from the backend, writes camelCase to the view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct IncubatorStatus {
    pub current_project: Option<String>,
    pub status: Option<String>,
    pub path: Option<String>,
}

/// One open position in the wealth ticker; unknown fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub title: Option<String>,
    pub roi: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Position {
    /// Short ticker label, e.g. `SaaS Launc... (+12.5%)`.
    pub fn label(&self) -> String {
        let title = self.title.as_deref().unwrap_or("Position");
        let short: String = title.chars().take(10).collect();
        format!("{}... (+{:.1}%)", short, self.roi.unwrap_or(0.0))
    }
}

/// GET /api/wealth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WealthSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub balance: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_positions: Vec<Position>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<serde_json::Value>,
}

impl WealthSnapshot {
    pub fn position_labels(&self, limit: usize) -> Vec<String> {
        self.active_positions
            .iter()
            .take(limit)
            .map(Position::label)
            .collect()
    }
}

/// Feeds fetched once when the sync loop starts. Wealth is also refreshed by the poll timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Identity,
    Tasks,
    Activity,
    Trends,
    Incubator,
    Wealth,
}

impl Feed {
    pub const ALL: [Feed; 6] = [
        Feed::Identity,
        Feed::Tasks,
        Feed::Activity,
        Feed::Trends,
        Feed::Incubator,
        Feed::Wealth,
    ];

    /// Path segments under the API base.
    pub fn segments(self) -> &'static [&'static str] {
        match self {
            Feed::Identity => &["identity"],
            Feed::Tasks => &["tasks"],
            Feed::Activity => &["moltbook", "activity"],
            Feed::Trends => &["forge", "trends"],
            Feed::Incubator => &["forge", "status"],
            Feed::Wealth => &["wealth"],
        }
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments().join("/"))
    }
}
