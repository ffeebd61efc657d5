mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::StatusCode;
use trellis::error::AppError;
use trellis::fetch::client::{CollectionSource, HttpCollectionSource};
use trellis::fetch::store::SnapshotStore;
use trellis::models::project::ImpactLevel;
use trellis::models::search::EntityKind;

#[tokio::test]
async fn http_source_decodes_every_collection() {
    let env = common::TestEnv::start().await;
    let source = env.source();

    let projects = source.fetch_projects().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, "1");
    assert_eq!(projects[0].impact_level, Some(ImpactLevel::High));
    assert!(projects[1].priority_score.is_none());

    let news = source.fetch_news().await.unwrap();
    assert_eq!(news[1].excerpt.as_deref(), Some("Elections open in May"));

    let events = source.fetch_events().await.unwrap();
    assert_eq!(events[0].id, "e-1");

    assert_eq!(source.fetch_gallery().await.unwrap().len(), 1);
    assert_eq!(source.fetch_members().await.unwrap()[0].id, "1000");
}

#[tokio::test]
async fn store_holds_full_snapshot() {
    let env = common::TestEnv::start().await;
    let store = env.store().await;

    assert_eq!(store.snapshot().total_len(), common::fixture_total());
}

#[tokio::test]
async fn failed_collection_stays_stale_but_available() {
    let env = common::TestEnv::start().await;
    let store = env.store().await;
    let before = store.snapshot();

    env.projects_down.store(true, Ordering::SeqCst);
    let report = store.refresh().await;

    assert_eq!(report.failed, vec![EntityKind::Project]);
    assert_eq!(report.refreshed.len(), 4);
    assert_eq!(store.snapshot().projects, before.projects);
    assert_eq!(store.snapshot().total_len(), common::fixture_total());
}

#[tokio::test]
async fn server_error_is_a_fetch_error() {
    let addr = common::start_failing_backend(StatusCode::INTERNAL_SERVER_ERROR).await;
    let source = HttpCollectionSource::new(&format!("http://{addr}")).unwrap();

    let err = source.fetch_members().await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn unreachable_backend_leaves_empty_snapshot() {
    let addr = common::start_failing_backend(StatusCode::BAD_GATEWAY).await;
    let source = HttpCollectionSource::new(&format!("http://{addr}")).unwrap();
    let store = SnapshotStore::new(Arc::new(source));

    let report = store.refresh().await;
    assert_eq!(report.failed.len(), 5);
    assert!(store.snapshot().is_empty());
}
