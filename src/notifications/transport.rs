use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

/// A live connection's messages. The stream ends when the connection drops.
pub type NotificationStream = BoxStream<'static, Result<Notification, AppError>>;

/// Something that can open a notification connection.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn connect(&self) -> Result<NotificationStream, AppError>;
}

/// In-process transport: every connection subscribes to a broadcast channel.
#[derive(Clone)]
pub struct BroadcastTransport {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastTransport {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver to every connected client. Returns the number of receivers.
    pub fn publish(&self, notification: Notification) -> usize {
        self.tx.send(notification).unwrap_or(0)
    }
}

#[async_trait]
impl NotificationTransport for BroadcastTransport {
    async fn connect(&self) -> Result<NotificationStream, AppError> {
        let rx = self.tx.subscribe();
        let stream = futures::stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(n) => return Some((Ok(n), rx)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Notification subscriber lagged, {} skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Ok(stream.boxed())
    }
}
