#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use trellis::fetch::client::HttpCollectionSource;
use trellis::fetch::store::SnapshotStore;

/// A stand-in for the portal's REST backend, served on an ephemeral port.
///
/// The server task lives as long as the runtime of the test that started it.
pub struct TestEnv {
    pub addr: SocketAddr,
    /// While set, `/api/projects` answers 503.
    pub projects_down: Arc<AtomicBool>,
}

impl TestEnv {
    pub async fn start() -> Self {
        let projects_down = Arc::new(AtomicBool::new(false));
        let down = projects_down.clone();

        let router = Router::new()
            .route(
                "/api/projects",
                get(move || {
                    let down = down.clone();
                    async move {
                        if down.load(Ordering::SeqCst) {
                            StatusCode::SERVICE_UNAVAILABLE.into_response()
                        } else {
                            Json(projects()).into_response()
                        }
                    }
                }),
            )
            .route("/api/news", get(|| async { Json(news()) }))
            .route("/api/events", get(|| async { Json(events()) }))
            .route("/api/gallery", get(|| async { Json(gallery()) }))
            .route("/api/members", get(|| async { Json(members()) }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Stub backend crashed");
        });

        Self {
            addr,
            projects_down,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn source(&self) -> HttpCollectionSource {
        HttpCollectionSource::new(&self.base_url()).expect("Failed to build source")
    }

    /// A store that has completed one refresh against this backend.
    pub async fn store(&self) -> Arc<SnapshotStore> {
        let store = Arc::new(SnapshotStore::new(Arc::new(self.source())));
        let report = store.refresh().await;
        assert!(report.is_complete(), "initial refresh failed: {report:?}");
        store
    }
}

/// Serves a fixed status for every collection, for error-path tests.
pub async fn start_failing_backend(status: StatusCode) -> SocketAddr {
    let router = Router::new().fallback(move || async move { status });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind failing backend");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Failing backend crashed");
    });
    addr
}

pub fn projects() -> Value {
    json!([
        {
            "id": 1,
            "title": "Community Garden",
            "description": "Raised beds and a compost program for the east side.",
            "category": "environment",
            "status": "active",
            "imageUrl": "/uploads/garden.jpg",
            "createdAt": "2024-03-10T09:00:00Z",
            "priorityScore": 9,
            "impactLevel": "high"
        },
        {
            "id": 2,
            "title": "Literacy Tutoring",
            "description": "Weekly reading sessions with local schools.",
            "category": "education",
            "status": "completed",
            "createdAt": "2023-01-15"
        }
    ])
}

pub fn news() -> Value {
    json!([
        {
            "id": 10,
            "title": "Spring Volunteer Recap",
            "content": "x".repeat(300),
            "status": "published",
            "publishedAt": "2024-04-02T12:00:00Z"
        },
        {
            "id": 11,
            "title": "Board Elections",
            "content": "Vote for the new board.",
            "excerpt": "Elections open in May",
            "category": "announcements",
            "status": "draft",
            "publishedAt": "2024-04-20"
        }
    ])
}

pub fn events() -> Value {
    json!([
        {
            "id": "e-1",
            "title": "Community Workshop",
            "description": "Repair bikes together.",
            "category": "workshop",
            "status": "upcoming",
            "location": "Main Library",
            "date": "2024-05-18"
        },
        {
            "id": "e-2",
            "title": "Tree Planting",
            "description": "Planting 200 saplings along the river.",
            "category": "environmental",
            "status": "upcoming",
            "location": "Riverside Park",
            "date": "2024-06-01"
        }
    ])
}

pub fn gallery() -> Value {
    json!([
        {
            "id": 100,
            "title": "Harvest Day",
            "category": "environment",
            "status": "published",
            "imageUrl": "/uploads/harvest.jpg",
            "createdAt": "2023-10-01"
        }
    ])
}

pub fn members() -> Value {
    json!([
        {
            "id": 1000,
            "name": "Amara Chukwu",
            "bio": "Leads the garden workshop series.",
            "position": "Volunteer Coordinator",
            "status": "active",
            "createdAt": "2022-05-05"
        }
    ])
}

/// Number of records across all fixture collections.
pub fn fixture_total() -> usize {
    [projects(), news(), events(), gallery(), members()]
        .iter()
        .map(|v| v.as_array().map(Vec::len).unwrap_or(0))
        .sum()
}
