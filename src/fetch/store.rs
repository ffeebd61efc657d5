use std::sync::{Arc, RwLock};

use serde::Serialize;

use super::client::CollectionSource;
use crate::error::AppError;
use crate::models::search::EntityKind;
use crate::models::snapshot::Snapshot;

/// Outcome of a refresh: which collections were replaced and which kept
/// their previous copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub refreshed: Vec<EntityKind>,
    pub failed: Vec<EntityKind>,
}

impl RefreshReport {
    fn record<T>(&mut self, kind: EntityKind, result: Result<Vec<T>, AppError>, slot: &mut Vec<T>) {
        match result {
            Ok(records) => {
                tracing::debug!("Fetched {} {} records", records.len(), kind);
                *slot = records;
                self.refreshed.push(kind);
            }
            Err(e) => {
                tracing::warn!("Keeping stale {} collection: {}", kind, e);
                self.failed.push(kind);
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Holds the last successfully fetched copy of every collection.
///
/// Searches read an `Arc<Snapshot>` that is never mutated; a refresh builds a
/// new snapshot and swaps it in. Refreshes run one at a time.
pub struct SnapshotStore {
    source: Arc<dyn CollectionSource>,
    current: RwLock<Arc<Snapshot>>,
    refreshing: tokio::sync::Mutex<()>,
}

impl SnapshotStore {
    pub fn new(source: Arc<dyn CollectionSource>) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(Snapshot::default())),
            refreshing: tokio::sync::Mutex::new(()),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Fetch all five collections concurrently.
    ///
    /// Each collection is replaced only if its fetch succeeded; failures keep
    /// the previous copy.
    pub async fn refresh(&self) -> RefreshReport {
        let _refreshing = self.refreshing.lock().await;

        let (projects, news, events, gallery, members) = futures::join!(
            self.source.fetch_projects(),
            self.source.fetch_news(),
            self.source.fetch_events(),
            self.source.fetch_gallery(),
            self.source.fetch_members(),
        );

        let mut next = (*self.snapshot()).clone();
        let mut report = RefreshReport::default();
        report.record(EntityKind::Project, projects, &mut next.projects);
        report.record(EntityKind::News, news, &mut next.news);
        report.record(EntityKind::Event, events, &mut next.events);
        report.record(EntityKind::Gallery, gallery, &mut next.gallery);
        report.record(EntityKind::Member, members, &mut next.members);

        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Arc::new(next);

        tracing::info!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            "Snapshot refreshed"
        );

        report
    }
}
