// User-triggered commands forwarded into the sync loop

use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SendChat(String),
    TriggerAction(String),
}

#[derive(Debug, Error)]
#[error("sync loop has stopped")]
pub struct SyncStopped;

/// Cloneable sender for chat and action commands.
#[derive(Debug, Clone)]
pub struct Commander {
    tx: mpsc::Sender<Command>,
}

impl Commander {
    pub fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), SyncStopped> {
        self.tx
            .send(Command::SendChat(text.into()))
            .await
            .map_err(|_| SyncStopped)
    }

    pub async fn trigger_action(&self, name: impl Into<String>) -> Result<(), SyncStopped> {
        self.tx
            .send(Command::TriggerAction(name.into()))
            .await
            .map_err(|_| SyncStopped)
    }
}
