use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;

/// Persistence for the ids of notices a viewer has dismissed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeDismissalStore: Send + Sync {
    /// Ids dismissed so far. A store that was never written returns an empty set.
    async fn load(&self) -> Result<BTreeSet<String>, AppError>;

    /// Replace the dismissed set.
    async fn save(&self, dismissed: &BTreeSet<String>) -> Result<(), AppError>;
}

/// Dismissals that live as long as the process.
#[derive(Default)]
pub struct InMemoryDismissalStore {
    dismissed: Mutex<BTreeSet<String>>,
}

#[async_trait]
impl NoticeDismissalStore for InMemoryDismissalStore {
    async fn load(&self) -> Result<BTreeSet<String>, AppError> {
        self.dismissed
            .lock()
            .map(|set| set.clone())
            .map_err(|e| AppError::Storage(format!("dismissal store poisoned: {e}")))
    }

    async fn save(&self, dismissed: &BTreeSet<String>) -> Result<(), AppError> {
        let mut guard = self
            .dismissed
            .lock()
            .map_err(|e| AppError::Storage(format!("dismissal store poisoned: {e}")))?;
        *guard = dismissed.clone();
        Ok(())
    }
}

/// Dismissals kept as a JSON array of ids in a file.
pub struct JsonFileDismissalStore {
    path: PathBuf,
}

impl JsonFileDismissalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NoticeDismissalStore for JsonFileDismissalStore {
    async fn load(&self) -> Result<BTreeSet<String>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|e| {
                AppError::Decode(format!(
                    "Invalid dismissal file '{}': {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeSet::new()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, dismissed: &BTreeSet<String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }

        let body = serde_json::to_vec_pretty(dismissed)
            .map_err(|e| AppError::Internal(format!("Failed to encode dismissals: {e}")))?;

        tokio::fs::write(&self.path, body).await.map_err(|e| {
            AppError::Storage(format!("Failed to write '{}': {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileDismissalStore::new(dir.path().join("dismissed.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("dismissed.json");
        let store = JsonFileDismissalStore::new(&path);

        let ids: BTreeSet<String> = ["n-2", "n-1"].into_iter().map(String::from).collect();
        store.save(&ids).await.unwrap();

        let reopened = JsonFileDismissalStore::new(&path);
        assert_eq!(reopened.load().await.unwrap(), ids);
    }

    #[tokio::test]
    async fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissed.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileDismissalStore::new(&path);
        assert!(matches!(store.load().await, Err(AppError::Decode(_))));
    }
}
