// Typed HTTP client for the bot backend (/api on port 8001)

mod error;

pub use error::ApiError;

use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

use crate::config::BackendConfig;
use crate::models::{
    ActionReply, ActivityFeed, ChatReply, ChatRequest, ContentDoc, Feed, HealthReading,
    IncubatorStatus, WealthSnapshot,
};
use crate::version::user_agent;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:8001/api`.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical url".into(),
            });
        }
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(user_agent())
            .build()?;
        Ok(Self { client, base })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Appends path segments to the base; each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments);
        let resp = self.client.get(url.clone()).send().await?;
        Self::decode(url, resp).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.url(segments);
        let mut req = self.client.post(url.clone());
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Self::decode(url, resp).await
    }

    async fn decode<T: DeserializeOwned>(url: Url, resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: url.path().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.json::<T>().await?)
    }

    #[instrument(skip(self), fields(operation = "get_identity"))]
    pub async fn get_identity(&self) -> Result<String, ApiError> {
        let doc: Option<ContentDoc> = self.get_json(Feed::Identity.segments()).await?;
        Ok(doc.unwrap_or_default().into_text())
    }

    #[instrument(skip(self), fields(operation = "get_tasks"))]
    pub async fn get_tasks(&self) -> Result<String, ApiError> {
        let doc: Option<ContentDoc> = self.get_json(Feed::Tasks.segments()).await?;
        Ok(doc.unwrap_or_default().into_text())
    }

    /// A JSON `null` body maps to `None`.
    #[instrument(skip(self), fields(operation = "get_activity"))]
    pub async fn get_activity(&self) -> Result<Option<ActivityFeed>, ApiError> {
        let value: serde_json::Value = self.get_json(Feed::Activity.segments()).await?;
        Ok((!value.is_null()).then_some(ActivityFeed(value)))
    }

    /// Anything other than a JSON array maps to an empty list.
    #[instrument(skip(self), fields(operation = "get_trends"))]
    pub async fn get_trends(&self) -> Result<Vec<serde_json::Value>, ApiError> {
        let value: serde_json::Value = self.get_json(Feed::Trends.segments()).await?;
        Ok(match value {
            serde_json::Value::Array(items) => items,
            _ => Vec::new(),
        })
    }

    #[instrument(skip(self), fields(operation = "get_incubator_status"))]
    pub async fn get_incubator_status(&self) -> Result<Option<IncubatorStatus>, ApiError> {
        self.get_json(Feed::Incubator.segments()).await
    }

    #[instrument(skip(self), fields(operation = "get_wealth"))]
    pub async fn get_wealth(&self) -> Result<WealthSnapshot, ApiError> {
        let wealth: Option<WealthSnapshot> = self.get_json(Feed::Wealth.segments()).await?;
        Ok(wealth.unwrap_or_default())
    }

    #[instrument(skip(self), fields(operation = "get_health"))]
    pub async fn get_health(&self) -> Result<HealthReading, ApiError> {
        let reading: Option<HealthReading> = self.get_json(&["health"]).await?;
        Ok(reading.unwrap_or_default())
    }

    #[instrument(skip(self), fields(operation = "trigger_action"))]
    pub async fn trigger_action(&self, name: &str) -> Result<ActionReply, ApiError> {
        let reply: Option<ActionReply> = self
            .post_json::<(), _>(&["actions", name], None)
            .await?;
        Ok(reply.unwrap_or_default())
    }

    #[instrument(skip(self, text), fields(operation = "send_chat", len = text.len()))]
    pub async fn send_chat(&self, text: &str) -> Result<ChatReply, ApiError> {
        let body = ChatRequest {
            text: text.to_string(),
        };
        let reply: Option<ChatReply> = self.post_json(&["chat"], Some(&body)).await?;
        Ok(reply.unwrap_or_default())
    }
}
