//! In-Memory Artifact Store Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{ArtifactError, ArtifactStorePort, DownloadableResult};

struct StoredArtifact {
    bytes: Vec<u8>,
    created_at: DateTime<Utc>,
}

/// 内存下载资源存储
///
/// 句柄形如 `artifact://<uuid>`，释放即从表中移除
pub struct InMemoryArtifactStore {
    artifacts: DashMap<String, StoredArtifact>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self {
            artifacts: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.artifacts.contains_key(handle)
    }
}

impl Default for InMemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStorePort for InMemoryArtifactStore {
    async fn materialize(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<DownloadableResult, ArtifactError> {
        let handle = format!("artifact://{}", Uuid::new_v4());
        let size = bytes.len() as u64;
        self.artifacts.insert(
            handle.clone(),
            StoredArtifact {
                bytes,
                created_at: Utc::now(),
            },
        );
        tracing::debug!(handle = %handle, size, "Artifact materialized");

        Ok(DownloadableResult {
            handle,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size,
        })
    }

    async fn read(&self, handle: &str) -> Result<Vec<u8>, ArtifactError> {
        self.artifacts
            .get(handle)
            .map(|a| a.bytes.clone())
            .ok_or_else(|| ArtifactError::NotFound(handle.to_string()))
    }

    fn release(&self, handle: &str) -> Result<bool, ArtifactError> {
        Ok(self
            .artifacts
            .remove(handle)
            .map(|(_, artifact)| {
                let age = Utc::now() - artifact.created_at;
                tracing::debug!(
                    handle = %handle,
                    age_ms = age.num_milliseconds(),
                    "Artifact released"
                );
            })
            .is_some())
    }

    fn live_count(&self) -> usize {
        self.artifacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_artifact_lifecycle() {
        let store = InMemoryArtifactStore::new();

        let result = store
            .materialize(b"Hello".to_vec(), "application/x-subrip", "out.srt")
            .await
            .unwrap();
        assert!(result.handle.starts_with("artifact://"));
        assert_eq!(result.size, 5);
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.read(&result.handle).await.unwrap(), b"Hello");

        // Release is idempotent
        assert!(store.release(&result.handle).unwrap());
        assert!(!store.release(&result.handle).unwrap());
        assert_eq!(store.live_count(), 0);
        assert!(matches!(
            store.read(&result.handle).await,
            Err(ArtifactError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_handles_are_unique() {
        let store = InMemoryArtifactStore::new();
        let a = store.materialize(vec![1], "text/plain", "a").await.unwrap();
        let b = store.materialize(vec![1], "text/plain", "a").await.unwrap();
        assert_ne!(a.handle, b.handle);
        assert_eq!(store.live_count(), 2);
    }
}
