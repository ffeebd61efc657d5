use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::AppError;
use crate::fetch::store::RefreshReport;
use crate::models::search::{EntityScope, SearchResult};
use crate::search::discovery::{recommend_projects, Recommendation};
use crate::search::facets::Facets;
use crate::search::filter::{SearchFilters, SearchParams};

/// A search result plus the portal page it links to.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub result: SearchResult,
    pub link: String,
}

impl From<SearchResult> for SearchHit {
    fn from(result: SearchResult) -> Self {
        let link = result.link();
        Self { result, link }
    }
}

/// `GET /api/v1/search?q=&type=&category=&status=`
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, AppError> {
    let filters = SearchFilters::try_from(params)?;
    let snapshot = state.store.snapshot();

    let hits = state
        .engine
        .search(&snapshot, &filters)
        .into_iter()
        .map(SearchHit::from)
        .collect();

    Ok(Json(hits))
}

#[derive(Debug, Deserialize)]
pub struct FacetParams {
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
}

/// `GET /api/v1/search/facets?type=`
pub async fn facets_handler(
    State(state): State<AppState>,
    Query(params): Query<FacetParams>,
) -> Result<Json<Facets>, AppError> {
    let scope = match params.entity_type.as_deref() {
        Some(raw) => raw.parse()?,
        None => EntityScope::All,
    };
    Ok(Json(Facets::collect(&state.store.snapshot(), scope)))
}

/// `GET /api/v1/discover`
pub async fn discover_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let snapshot = state.store.snapshot();
    let recommendations = recommend_projects(
        &snapshot.projects,
        &state.discovery.rules,
        state.discovery.limit,
        Utc::now(),
    )?;
    Ok(Json(recommendations))
}

/// `POST /api/v1/snapshot/refresh`
pub async fn refresh_handler(State(state): State<AppState>) -> Json<RefreshReport> {
    let report = state.store.refresh().await;
    state.feed.announce_refresh(&report);
    Json(report)
}
