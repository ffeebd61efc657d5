use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::notifications::inbox::{InboxEntry, NotificationInbox};

#[derive(Debug, Serialize)]
pub struct InboxView {
    pub unread: usize,
    pub entries: Vec<InboxEntry>,
}

impl From<&NotificationInbox> for InboxView {
    fn from(inbox: &NotificationInbox) -> Self {
        Self {
            unread: inbox.unread_count(),
            entries: inbox.entries().cloned().collect(),
        }
    }
}

/// `GET /api/v1/notifications`
pub async fn inbox_handler(State(state): State<AppState>) -> Json<InboxView> {
    let inbox = state.feed.inbox();
    let inbox = inbox.lock().await;
    Json(InboxView::from(&*inbox))
}

/// `POST /api/v1/notifications/read`
pub async fn mark_all_read_handler(State(state): State<AppState>) -> Json<InboxView> {
    let inbox = state.feed.inbox();
    let mut inbox = inbox.lock().await;
    inbox.mark_all_read();
    Json(InboxView::from(&*inbox))
}
