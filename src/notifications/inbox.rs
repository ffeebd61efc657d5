use std::collections::VecDeque;

use serde::Serialize;

use super::transport::Notification;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InboxEntry {
    pub notification: Notification,
    pub read: bool,
}

/// The notification dropdown: newest first, bounded, with read tracking.
#[derive(Debug, Clone)]
pub struct NotificationInbox {
    entries: VecDeque<InboxEntry>,
    capacity: usize,
}

impl NotificationInbox {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Add a notification at the top, evicting the oldest beyond capacity.
    /// A notification whose id is already present is ignored.
    pub fn push(&mut self, notification: Notification) {
        if self
            .entries
            .iter()
            .any(|e| e.notification.id == notification.id)
        {
            return;
        }
        self.entries.push_front(InboxEntry {
            notification,
            read: false,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.read).count()
    }

    /// Returns `false` if no entry has this id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.notification.id == id) {
            Some(entry) => {
                entry.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &InboxEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
