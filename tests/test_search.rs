mod common;

use trellis::models::search::{EntityKind, EntityScope};
use trellis::search::engine::SearchEngine;
use trellis::search::filter::SearchFilters;

#[tokio::test]
async fn workshop_query_scoped_to_events() {
    let env = common::TestEnv::start().await;
    let store = env.store().await;

    let filters = SearchFilters::new("workshop")
        .with_scope(EntityScope::Only(EntityKind::Event))
        .with_category("all")
        .with_status("all");
    let results = SearchEngine::default().search(&store.snapshot(), &filters);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "e-1");
    assert_eq!(results[0].kind, EntityKind::Event);
    assert_eq!(results[0].relevance_score, 60.0);
    assert_eq!(results[0].location.as_deref(), Some("Main Library"));
}

#[tokio::test]
async fn empty_query_returns_every_record() {
    let env = common::TestEnv::start().await;
    let store = env.store().await;

    let results = SearchEngine::default().search(&store.snapshot(), &SearchFilters::new(""));
    assert_eq!(results.len(), common::fixture_total());
}

#[tokio::test]
async fn news_without_excerpt_gets_preview() {
    let env = common::TestEnv::start().await;
    let store = env.store().await;

    let filters = SearchFilters::new("spring").with_scope(EntityScope::Only(EntityKind::News));
    let results = SearchEngine::default().search(&store.snapshot(), &filters);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].description, format!("{}...", "x".repeat(150)));
}

#[tokio::test]
async fn category_filter_removes_other_categories() {
    let env = common::TestEnv::start().await;
    let store = env.store().await;
    let engine = SearchEngine::default();

    let filtered = engine.search(
        &store.snapshot(),
        &SearchFilters::new("").with_category("environment"),
    );
    assert_eq!(filtered.len(), 2);
    assert!(filtered
        .iter()
        .all(|r| r.category.as_deref() == Some("environment")));

    let unfiltered = engine.search(&store.snapshot(), &SearchFilters::new("").with_category("all"));
    assert_eq!(unfiltered.len(), common::fixture_total());
}

#[tokio::test]
async fn results_are_ordered_and_reproducible() {
    let env = common::TestEnv::start().await;
    let store = env.store().await;
    let engine = SearchEngine::default();
    let filters = SearchFilters::new("garden");

    let first = engine.search(&store.snapshot(), &filters);
    let second = engine.search(&store.snapshot(), &filters);

    assert!(!first.is_empty());
    assert_eq!(first, second);
    for pair in first.windows(2) {
        assert!(pair[0].relevance_score >= pair[1].relevance_score);
    }
    assert_eq!(first[0].kind, EntityKind::Project);
    assert_eq!(first[0].relevance_score, 60.0);
    assert_eq!(first[1].kind, EntityKind::Member);
}
