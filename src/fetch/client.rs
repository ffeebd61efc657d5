use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::AppError;
use crate::models::event::Event;
use crate::models::gallery::GalleryImage;
use crate::models::member::Member;
use crate::models::news::NewsArticle;
use crate::models::project::Project;
use crate::models::search::EntityKind;
use crate::models::snapshot::Snapshot;

/// Read-only access to the portal's collections.
///
/// Abstracted as a trait so tests can use a mock without a running backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn fetch_projects(&self) -> Result<Vec<Project>, AppError>;

    async fn fetch_news(&self) -> Result<Vec<NewsArticle>, AppError>;

    async fn fetch_events(&self) -> Result<Vec<Event>, AppError>;

    async fn fetch_gallery(&self) -> Result<Vec<GalleryImage>, AppError>;

    async fn fetch_members(&self) -> Result<Vec<Member>, AppError>;
}

/// Fetches whole collections from the portal's REST API.
///
/// No paging or filtering is pushed down; every call returns the full
/// collection.
pub struct HttpCollectionSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCollectionSource {
    /// Create a source rooted at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("trellis/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Self::with_client(client, base_url)
    }

    /// Create with an explicit client (useful for testing / DI).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid API base URL '{base_url}': {e}")))?;
        // Joining relative paths replaces the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn endpoint(&self, kind: EntityKind) -> Result<Url, AppError> {
        self.base_url
            .join(kind.collection_path())
            .map_err(|e| AppError::Config(format!("Invalid endpoint for {kind}: {e}")))
    }

    async fn fetch_all<T: DeserializeOwned>(&self, kind: EntityKind) -> Result<Vec<T>, AppError> {
        let url = self.endpoint(kind)?;
        tracing::debug!("Fetching {} collection from {}", kind, url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("GET {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::Fetch(format!("GET {url} failed: {e}")))?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| AppError::Decode(format!("Invalid {kind} payload from {url}: {e}")))
    }
}

#[async_trait]
impl CollectionSource for HttpCollectionSource {
    async fn fetch_projects(&self) -> Result<Vec<Project>, AppError> {
        self.fetch_all(EntityKind::Project).await
    }

    async fn fetch_news(&self) -> Result<Vec<NewsArticle>, AppError> {
        self.fetch_all(EntityKind::News).await
    }

    async fn fetch_events(&self) -> Result<Vec<Event>, AppError> {
        self.fetch_all(EntityKind::Event).await
    }

    async fn fetch_gallery(&self) -> Result<Vec<GalleryImage>, AppError> {
        self.fetch_all(EntityKind::Gallery).await
    }

    async fn fetch_members(&self) -> Result<Vec<Member>, AppError> {
        self.fetch_all(EntityKind::Member).await
    }
}

/// Serves a fixed snapshot, e.g. one exported to a JSON file for offline use.
pub struct StaticCollectionSource {
    snapshot: Snapshot,
}

impl StaticCollectionSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON document with one array per collection.
    pub async fn from_json_file(path: &std::path::Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read(path).await.map_err(|e| {
            AppError::Storage(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let snapshot = serde_json::from_slice(&raw).map_err(|e| {
            AppError::Decode(format!("Invalid snapshot file '{}': {}", path.display(), e))
        })?;
        Ok(Self::new(snapshot))
    }
}

#[async_trait]
impl CollectionSource for StaticCollectionSource {
    async fn fetch_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.snapshot.projects.clone())
    }

    async fn fetch_news(&self) -> Result<Vec<NewsArticle>, AppError> {
        Ok(self.snapshot.news.clone())
    }

    async fn fetch_events(&self) -> Result<Vec<Event>, AppError> {
        Ok(self.snapshot.events.clone())
    }

    async fn fetch_gallery(&self) -> Result<Vec<GalleryImage>, AppError> {
        Ok(self.snapshot.gallery.clone())
    }

    async fn fetch_members(&self) -> Result<Vec<Member>, AppError> {
        Ok(self.snapshot.members.clone())
    }
}
