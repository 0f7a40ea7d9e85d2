// One request per spawned task; each result goes back to the loop as a single Event.

use std::sync::Arc;
use tokio::sync::mpsc;

use super::now_ms;
use crate::api::ApiClient;
use crate::models::{Feed, TurnId};
use crate::state::Event;

/// Sends the event unless the loop is gone; results arriving after teardown are dropped here.
fn deliver(events: &mpsc::UnboundedSender<Event>, event: Event) {
    if events.send(event).is_err() {
        tracing::debug!(
            operation = "deliver_event",
            "sync loop stopped; dropping late response"
        );
    }
}

pub(super) fn spawn_feed(api: Arc<ApiClient>, feed: Feed, events: mpsc::UnboundedSender<Event>) {
    tokio::spawn(async move {
        let result = match feed {
            Feed::Identity => api.get_identity().await.map(Event::IdentityLoaded),
            Feed::Tasks => api.get_tasks().await.map(Event::TasksLoaded),
            Feed::Activity => api.get_activity().await.map(Event::ActivityLoaded),
            Feed::Trends => api.get_trends().await.map(Event::TrendsLoaded),
            Feed::Incubator => api.get_incubator_status().await.map(Event::IncubatorLoaded),
            Feed::Wealth => api.get_wealth().await.map(Event::WealthLoaded),
        };
        let event = result.unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                endpoint = %feed,
                operation = "fetch_feed",
                "feed fetch failed; keeping previous value"
            );
            Event::FeedFailed(feed)
        });
        deliver(&events, event);
    });
}

pub(super) fn spawn_health(api: Arc<ApiClient>, events: mpsc::UnboundedSender<Event>) {
    tokio::spawn(async move {
        let event = match api.get_health().await {
            Ok(reading) => Event::HealthSucceeded {
                timestamp: now_ms(),
                reading,
            },
            Err(e) => {
                tracing::debug!(error = %e, operation = "get_health", "health poll failed");
                Event::HealthFailed
            }
        };
        deliver(&events, event);
    });
}

pub(super) fn spawn_action(api: Arc<ApiClient>, name: String, events: mpsc::UnboundedSender<Event>) {
    tokio::spawn(async move {
        let event = match api.trigger_action(&name).await {
            Ok(reply) => Event::ActionCompleted {
                timestamp: now_ms(),
                reply,
            },
            Err(e) => {
                tracing::warn!(error = %e, action = %name, operation = "trigger_action", "action failed");
                Event::ActionFailed {
                    timestamp: now_ms(),
                }
            }
        };
        deliver(&events, event);
    });
}

pub(super) fn spawn_chat(
    api: Arc<ApiClient>,
    id: TurnId,
    text: String,
    events: mpsc::UnboundedSender<Event>,
) {
    tokio::spawn(async move {
        let event = match api.send_chat(&text).await {
            Ok(reply) => Event::ChatResolved {
                id,
                reply: reply.into_text(),
            },
            Err(e) => {
                tracing::warn!(error = %e, turn = %id, operation = "send_chat", "chat request failed");
                Event::ChatFailed { id }
            }
        };
        deliver(&events, event);
    });
}
