use chrono::{DateTime, Utc};

use super::filter::{filter_collection, SearchFilters};
use super::strategy::ScoringStrategy;
use crate::error::AppError;
use crate::models::snapshot::Snapshot;
use crate::models::search::SearchResult;

/// Default number of characters kept when previewing a long text field.
pub const DEFAULT_PREVIEW_LEN: usize = 150;

/// Runs the filter/score/sort pipeline over a snapshot.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    strategy: ScoringStrategy,
    preview_len: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(ScoringStrategy::default(), DEFAULT_PREVIEW_LEN)
    }
}

impl SearchEngine {
    pub fn new(strategy: ScoringStrategy, preview_len: usize) -> Self {
        Self {
            strategy,
            preview_len,
        }
    }

    pub fn strategy(&self) -> &ScoringStrategy {
        &self.strategy
    }

    /// Search and swallow failures.
    ///
    /// Errors are logged and reported to the caller as "no results".
    pub fn search(&self, snapshot: &Snapshot, filters: &SearchFilters) -> Vec<SearchResult> {
        self.search_at(snapshot, filters, Utc::now())
    }

    pub fn search_at(
        &self,
        snapshot: &Snapshot,
        filters: &SearchFilters,
        now: DateTime<Utc>,
    ) -> Vec<SearchResult> {
        match self.try_search_at(snapshot, filters, now) {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(query = filters.query(), "Search failed: {}", e);
                Vec::new()
            }
        }
    }

    pub fn try_search(
        &self,
        snapshot: &Snapshot,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>, AppError> {
        self.try_search_at(snapshot, filters, Utc::now())
    }

    /// Filter every collection, concatenate, and sort by score descending.
    ///
    /// The sort is stable: equal scores keep the order projects, news, events,
    /// gallery, members, and collection order within each.
    pub fn try_search_at(
        &self,
        snapshot: &Snapshot,
        filters: &SearchFilters,
        now: DateTime<Utc>,
    ) -> Result<Vec<SearchResult>, AppError> {
        self.strategy.validate()?;

        let strategy = &self.strategy;
        let len = self.preview_len;

        let mut results = filter_collection(&snapshot.projects, filters, strategy, len, now);
        results.extend(filter_collection(&snapshot.news, filters, strategy, len, now));
        results.extend(filter_collection(&snapshot.events, filters, strategy, len, now));
        results.extend(filter_collection(&snapshot.gallery, filters, strategy, len, now));
        results.extend(filter_collection(&snapshot.members, filters, strategy, len, now));

        if let Some(bad) = results.iter().find(|r| !r.relevance_score.is_finite()) {
            return Err(AppError::Internal(format!(
                "non-finite relevance score for {} '{}'",
                bad.kind, bad.id
            )));
        }

        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

        tracing::debug!(
            query = filters.query(),
            hits = results.len(),
            "Search completed"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Event;
    use crate::models::gallery::GalleryImage;
    use crate::models::member::Member;
    use crate::models::news::NewsArticle;
    use crate::models::project::Project;
    use crate::models::search::{EntityKind, EntityScope};
    use crate::search::strategy::{BonusRules, FieldWeights};
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            projects: vec![Project {
                id: "p1".to_string(),
                title: "Garden Workshop Series".to_string(),
                description: "Hands-on growing sessions".to_string(),
                category: Some("education".to_string()),
                status: "active".to_string(),
                image_url: None,
                created_at: ts(),
                priority_score: Some(9),
                impact_level: None,
            }],
            news: vec![NewsArticle {
                id: "n1".to_string(),
                title: "Workshop".to_string(),
                content: "Recap of the spring workshop.".to_string(),
                excerpt: None,
                category: Some("announcements".to_string()),
                status: "published".to_string(),
                image: None,
                published_at: ts(),
            }],
            events: vec![
                Event {
                    id: "e1".to_string(),
                    title: "Community Workshop".to_string(),
                    description: "Bring your tools".to_string(),
                    category: "workshop".to_string(),
                    status: "upcoming".to_string(),
                    location: "Library".to_string(),
                    date: ts(),
                },
                Event {
                    id: "e2".to_string(),
                    title: "Tree Planting".to_string(),
                    description: "Along the river".to_string(),
                    category: "environmental".to_string(),
                    status: "upcoming".to_string(),
                    location: "Riverside".to_string(),
                    date: ts(),
                },
            ],
            gallery: vec![GalleryImage {
                id: "g1".to_string(),
                title: "Planting day".to_string(),
                description: None,
                category: Some("environmental".to_string()),
                status: "published".to_string(),
                image_url: "/img/planting.jpg".to_string(),
                created_at: ts(),
            }],
            members: vec![Member {
                id: "m1".to_string(),
                name: "Rosa Diaz".to_string(),
                bio: "Runs our workshop program".to_string(),
                position: "Program Lead".to_string(),
                status: "active".to_string(),
                profile_image_url: None,
                created_at: ts(),
            }],
        }
    }

    #[test]
    fn test_results_sorted_descending() {
        let results = SearchEngine::default().search(&snapshot(), &SearchFilters::new("workshop"));
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
        assert_eq!(results[0].id, "n1");
        assert_eq!(results[0].relevance_score, 100.0);
    }

    #[test]
    fn test_equal_scores_keep_collection_order() {
        let results = SearchEngine::default().search(&snapshot(), &SearchFilters::new(""));
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "n1", "e1", "e2", "g1", "m1"]);
    }

    #[test]
    fn test_invalid_strategy_yields_empty() {
        let engine = SearchEngine::new(
            ScoringStrategy::MaxWeightedField(FieldWeights {
                body: f64::INFINITY,
                ..FieldWeights::default()
            }),
            DEFAULT_PREVIEW_LEN,
        );
        assert!(engine.try_search(&snapshot(), &SearchFilters::new("")).is_err());
        assert!(engine.search(&snapshot(), &SearchFilters::new("")).is_empty());
    }

    #[test]
    fn test_additive_strategy_through_engine() {
        let engine = SearchEngine::new(
            ScoringStrategy::AdditiveBonus(BonusRules::default()),
            DEFAULT_PREVIEW_LEN,
        );
        let filters =
            SearchFilters::new("garden").with_scope(EntityScope::Only(EntityKind::Project));
        let now = ts() + chrono::Duration::days(1);
        let results = engine.search_at(&snapshot(), &filters, now);
        assert_eq!(results.len(), 1);
        // base + priority + recent + featured category + active
        assert_eq!(results[0].relevance_score, 95.0);
    }

    #[test]
    fn test_idempotent() {
        let engine = SearchEngine::default();
        let snap = snapshot();
        let filters = SearchFilters::new("plant");
        let first = engine.search(&snap, &filters);
        let second = engine.search(&snap, &filters);
        assert_eq!(first, second);
        assert_eq!(snap, snapshot());
    }
}
