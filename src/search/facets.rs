use std::collections::BTreeSet;

use serde::Serialize;

use super::entities::Searchable;
use crate::models::search::EntityScope;
use crate::models::snapshot::Snapshot;

/// Selector options for the category and status dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
}

impl Facets {
    /// Distinct non-empty categories and statuses of the collections in scope.
    pub fn collect(snapshot: &Snapshot, scope: EntityScope) -> Self {
        let mut facets = Facets::default();
        facets.add_all(&snapshot.projects, scope);
        facets.add_all(&snapshot.news, scope);
        facets.add_all(&snapshot.events, scope);
        facets.add_all(&snapshot.gallery, scope);
        facets.add_all(&snapshot.members, scope);
        facets
    }

    fn add_all<R: Searchable>(&mut self, records: &[R], scope: EntityScope) {
        if !scope.includes(R::KIND) {
            return;
        }
        for record in records {
            if let Some(category) = record.category().filter(|c| !c.trim().is_empty()) {
                self.categories.insert(category.to_string());
            }
            if !record.status().trim().is_empty() {
                self.statuses.insert(record.status().to_string());
            }
        }
    }
}
