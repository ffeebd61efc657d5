//! Operational notifications for portal staff.
//!
//! The server publishes events (such as a refresh that left collections
//! stale) on an in-process channel. A [`NotificationClient`] keeps a
//! connection to it and files everything into a shared inbox.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::client::{ConnectionState, NotificationClient};
use super::inbox::NotificationInbox;
use super::policy::ReconnectPolicy;
use super::transport::{BroadcastTransport, Notification, NotificationKind};
use crate::fetch::store::RefreshReport;

pub const DEFAULT_INBOX_CAPACITY: usize = 50;

pub struct NotificationFeed {
    transport: BroadcastTransport,
    inbox: Arc<Mutex<NotificationInbox>>,
    state: watch::Receiver<ConnectionState>,
    sequence: AtomicU64,
    task: JoinHandle<()>,
}

impl NotificationFeed {
    pub fn spawn(policy: ReconnectPolicy, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let transport = BroadcastTransport::new(capacity);
        let inbox = Arc::new(Mutex::new(NotificationInbox::new(capacity)));

        let mut client = NotificationClient::spawn(Arc::new(transport.clone()), policy, capacity);
        let state = client.state();
        let sink = inbox.clone();
        let task = tokio::spawn(async move {
            while let Some(notification) = client.recv().await {
                sink.lock().await.push(notification);
            }
            tracing::warn!("Notification feed stopped");
        });

        Self {
            transport,
            inbox,
            state,
            sequence: AtomicU64::new(0),
            task,
        }
    }

    /// Returns `false` when no client was connected to receive it.
    pub fn publish(&self, kind: NotificationKind, title: &str, body: &str) -> bool {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let notification = Notification {
            id: format!("feed-{seq}"),
            title: title.to_string(),
            body: body.to_string(),
            kind,
            created_at: Utc::now(),
        };
        self.transport.publish(notification) > 0
    }

    /// Warn when a refresh kept stale collections. Returns whether a
    /// warning was delivered.
    pub fn announce_refresh(&self, report: &RefreshReport) -> bool {
        if report.is_complete() {
            return false;
        }
        let stale = report
            .failed
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let delivered = self.publish(
            NotificationKind::Warning,
            "Some collections are out of date",
            &format!("Showing the last fetched copy of: {stale}"),
        );
        if !delivered {
            tracing::debug!("Refresh warning dropped, notification client not connected");
        }
        delivered
    }

    pub fn inbox(&self) -> Arc<Mutex<NotificationInbox>> {
        self.inbox.clone()
    }

    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::EntityKind;
    use std::time::Duration;

    async fn connected_feed() -> NotificationFeed {
        let feed = NotificationFeed::spawn(ReconnectPolicy::default(), 8);
        feed.state()
            .wait_for(|s| *s == ConnectionState::Connected)
            .await
            .unwrap();
        feed
    }

    async fn wait_for_entries(feed: &NotificationFeed, count: usize) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while feed.inbox().lock().await.len() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("inbox did not fill");
    }

    #[tokio::test]
    async fn test_stale_refresh_lands_in_inbox() {
        let feed = connected_feed().await;
        let report = RefreshReport {
            refreshed: vec![EntityKind::News],
            failed: vec![EntityKind::Project, EntityKind::Member],
        };

        assert!(feed.announce_refresh(&report));
        wait_for_entries(&feed, 1).await;

        let inbox = feed.inbox();
        let inbox = inbox.lock().await;
        let entry = inbox.entries().next().unwrap();
        assert_eq!(entry.notification.kind, NotificationKind::Warning);
        assert_eq!(
            entry.notification.body,
            "Showing the last fetched copy of: project, member"
        );
        assert_eq!(inbox.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_complete_refresh_is_silent() {
        let feed = connected_feed().await;
        let report = RefreshReport {
            refreshed: EntityKind::ALL.to_vec(),
            failed: vec![],
        };
        assert!(!feed.announce_refresh(&report));
    }

    #[tokio::test]
    async fn test_published_ids_are_unique() {
        let feed = connected_feed().await;
        assert!(feed.publish(NotificationKind::Info, "One", ""));
        assert!(feed.publish(NotificationKind::Info, "Two", ""));
        wait_for_entries(&feed, 2).await;

        let inbox = feed.inbox();
        let titles: Vec<String> = inbox
            .lock()
            .await
            .entries()
            .map(|e| e.notification.title.clone())
            .collect();
        assert_eq!(titles, vec!["Two", "One"]);
    }
}
