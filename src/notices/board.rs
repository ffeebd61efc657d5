use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::store::NoticeDismissalStore;
use crate::error::AppError;
use crate::models::wire::{flexible_datetime, flexible_datetime_opt, string_or_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    Low,
    Normal,
    High,
    Urgent,
}

/// Who a notice is addressed to. Ordered from widest to narrowest audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Public,
    Members,
    Admins,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub message: String,
    pub priority: NoticePriority,
    #[serde(default)]
    pub audience: Audience,
    #[serde(deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "flexible_datetime_opt")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::str::FromStr for Audience {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Audience::Public),
            "members" | "member" => Ok(Audience::Members),
            "admins" | "admin" => Ok(Audience::Admins),
            other => Err(AppError::BadRequest(format!("unknown audience '{other}'"))),
        }
    }
}

impl Notice {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// The notice board's per-viewer state: which notices were dismissed.
///
/// Writes through one board are serialized. Boards in separate processes
/// sharing a dismissal file are not coordinated.
pub struct NoticeBoard {
    store: Arc<dyn NoticeDismissalStore>,
    writes: Mutex<()>,
}

impl NoticeBoard {
    pub fn new(store: Arc<dyn NoticeDismissalStore>) -> Self {
        Self {
            store,
            writes: Mutex::new(()),
        }
    }

    /// Notices the viewer should see: not dismissed, not expired, addressed
    /// to an audience the viewer belongs to. Most urgent first, then newest.
    pub async fn visible(
        &self,
        notices: &[Notice],
        viewer: Audience,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notice>, AppError> {
        let dismissed = self.store.load().await?;

        let mut visible: Vec<Notice> = notices
            .iter()
            .filter(|n| !dismissed.contains(&n.id))
            .filter(|n| !n.is_expired(now))
            .filter(|n| n.audience <= viewer)
            .cloned()
            .collect();

        visible.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(visible)
    }

    pub async fn dismiss(&self, id: &str) -> Result<(), AppError> {
        let _write = self.writes.lock().await;
        let mut dismissed = self.store.load().await?;
        if dismissed.insert(id.to_string()) {
            self.store.save(&dismissed).await?;
            tracing::debug!("Dismissed notice {}", id);
        }
        Ok(())
    }

    /// Bring back every dismissed notice.
    pub async fn restore_all(&self) -> Result<(), AppError> {
        let _write = self.writes.lock().await;
        self.store.save(&BTreeSet::new()).await
    }
}
