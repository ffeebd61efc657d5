use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::entities::Searchable;
use super::relevance::normalize_query;
use super::strategy::ScoringStrategy;
use crate::error::AppError;
use crate::models::search::{EntityScope, SearchResult};

/// The user's current search controls. All filters combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    query: String,
    pub scope: EntityScope,
    /// `None` means "all".
    pub category: Option<String>,
    /// `None` means "all".
    pub status: Option<String>,
}

impl SearchFilters {
    pub fn new(query: &str) -> Self {
        Self {
            query: normalize_query(query),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: EntityScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = selector_value(category);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = selector_value(status);
        self
    }

    /// The lower-cased, trimmed query.
    pub fn query(&self) -> &str {
        &self.query
    }

    fn accepts_category(&self, category: Option<&str>) -> bool {
        match &self.category {
            None => true,
            Some(wanted) => wanted == category.unwrap_or(""),
        }
    }

    fn accepts_status(&self, status: &str) -> bool {
        match &self.status {
            None => true,
            Some(wanted) => wanted == status,
        }
    }
}

/// Selector values as sent by the portal UI; `all` and blank disable the filter.
fn selector_value(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Raw query-string form of [`SearchFilters`], as used by the HTTP API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<SearchParams> for SearchFilters {
    type Error = AppError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let scope = match params.entity_type.as_deref() {
            Some(raw) => raw.parse()?,
            None => EntityScope::All,
        };

        Ok(SearchFilters::new(&params.q)
            .with_scope(scope)
            .with_category(params.category.as_deref().unwrap_or("all"))
            .with_status(params.status.as_deref().unwrap_or("all")))
    }
}

/// Score, filter and map one collection.
///
/// Results keep collection order. Records are rejected when a non-empty
/// query scores 0, or when an active category/status filter differs.
pub fn filter_collection<R: Searchable>(
    records: &[R],
    filters: &SearchFilters,
    strategy: &ScoringStrategy,
    preview_len: usize,
    now: DateTime<Utc>,
) -> Vec<SearchResult> {
    if !filters.scope.includes(R::KIND) {
        return Vec::new();
    }

    let query = filters.query();
    records
        .iter()
        .filter_map(|record| {
            let scored = strategy.score(record, query, now);
            if scored.score == 0.0 && !query.is_empty() {
                return None;
            }
            if !filters.accepts_category(record.category())
                || !filters.accepts_status(record.status())
            {
                return None;
            }
            Some(record.to_result(scored.score, preview_len))
        })
        .collect()
}
