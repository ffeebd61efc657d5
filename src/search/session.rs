use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::debounce::Debouncer;
use super::engine::SearchEngine;
use super::filter::SearchFilters;
use crate::error::AppError;
use crate::fetch::store::SnapshotStore;
use crate::models::search::SearchResult;

/// An interactive search: filter updates are debounced, then the full
/// pipeline runs over the store's current snapshot and the latest results
/// are published.
pub struct SearchSession {
    debouncer: Debouncer<SearchFilters>,
    results: watch::Receiver<Arc<Vec<SearchResult>>>,
}

impl SearchSession {
    pub fn spawn(store: Arc<SnapshotStore>, engine: Arc<SearchEngine>, delay: Duration) -> Self {
        let (tx, results) = watch::channel(Arc::new(Vec::new()));

        let debouncer = Debouncer::spawn(delay, move |filters: SearchFilters| {
            let snapshot = store.snapshot();
            let hits = engine.search(&snapshot, &filters);
            tracing::debug!(query = filters.query(), hits = hits.len(), "Session search ran");
            // Nobody listening is not an error for a UI session.
            let _ = tx.send(Arc::new(hits));
        });

        Self { debouncer, results }
    }

    /// Record new search controls; the search runs once input settles.
    pub fn update(&self, filters: SearchFilters) -> Result<(), AppError> {
        self.debouncer.push(filters)
    }

    /// A receiver that is notified whenever a new result list is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<SearchResult>>> {
        self.results.clone()
    }

    /// The most recently published results.
    pub fn latest(&self) -> Arc<Vec<SearchResult>> {
        self.results.borrow().clone()
    }
}
