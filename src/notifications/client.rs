use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::policy::ReconnectPolicy;
use super::transport::{Notification, NotificationTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Reconnecting { attempt: u32, delay: Duration },
    /// Reconnect attempts are exhausted; the client has stopped.
    Failed,
    /// The consumer went away; the client has stopped.
    Closed,
}

/// Keeps a notification connection open, reconnecting with backoff, and
/// forwards messages to the consumer.
pub struct NotificationClient {
    notifications: mpsc::Receiver<Notification>,
    state: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl NotificationClient {
    pub fn spawn(
        transport: Arc<dyn NotificationTransport>,
        policy: ReconnectPolicy,
        buffer: usize,
    ) -> Self {
        let (tx, notifications) = mpsc::channel(buffer.max(1));
        let (state_tx, state) = watch::channel(ConnectionState::Connecting);
        let task = tokio::spawn(run(transport, policy, tx, state_tx));
        Self {
            notifications,
            state,
            task,
        }
    }

    /// Next notification, or `None` once the client has stopped.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.notifications.recv().await
    }

    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }
}

impl Drop for NotificationClient {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    transport: Arc<dyn NotificationTransport>,
    policy: ReconnectPolicy,
    tx: mpsc::Sender<Notification>,
    state: watch::Sender<ConnectionState>,
) {
    let mut attempt: u32 = 0;

    loop {
        state.send_replace(ConnectionState::Connecting);

        match transport.connect().await {
            Ok(mut stream) => {
                attempt = 0;
                state.send_replace(ConnectionState::Connected);
                tracing::info!("Notification channel connected");

                loop {
                    tokio::select! {
                        _ = tx.closed() => {
                            state.send_replace(ConnectionState::Closed);
                            return;
                        }
                        item = stream.next() => match item {
                            Some(Ok(notification)) => {
                                if tx.send(notification).await.is_err() {
                                    state.send_replace(ConnectionState::Closed);
                                    return;
                                }
                            }
                            Some(Err(e)) => {
                                tracing::warn!("Notification channel error: {}", e);
                                break;
                            }
                            None => break,
                        },
                    }
                }
                tracing::warn!("Notification channel disconnected");
            }
            Err(e) => tracing::warn!("Notification connect failed: {}", e),
        }

        if tx.is_closed() {
            state.send_replace(ConnectionState::Closed);
            return;
        }

        attempt = attempt.saturating_add(1);
        match policy.delay_for(attempt) {
            Some(delay) => {
                tracing::debug!("Reconnecting in {:?} (attempt {})", delay, attempt);
                state.send_replace(ConnectionState::Reconnecting { attempt, delay });
                tokio::time::sleep(delay).await;
            }
            None => {
                tracing::error!(
                    "Giving up on notification channel after {} attempts",
                    attempt - 1
                );
                state.send_replace(ConnectionState::Failed);
                return;
            }
        }
    }
}
