//! File Artifact Store - 文件系统下载资源实现
//!
//! 实现 ArtifactStorePort trait，每个资源存放在 `<base_dir>/<uuid>/<文件名>`

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{ArtifactError, ArtifactStorePort, DownloadableResult};

/// 文件系统下载资源存储
pub struct FileArtifactStore {
    /// 存储根目录
    base_dir: PathBuf,
    /// handle -> 文件路径
    artifacts: DashMap<String, PathBuf>,
}

impl FileArtifactStore {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ArtifactError::IoError(e.to_string()))?;

        Ok(Self {
            base_dir,
            artifacts: DashMap::new(),
        })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 句柄对应的文件路径
    pub fn path_of(&self, handle: &str) -> Option<PathBuf> {
        self.artifacts.get(handle).map(|p| p.clone())
    }

    fn safe_file_name(file_name: &str) -> String {
        Path::new(file_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "artifact.bin".to_string())
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    async fn materialize(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<DownloadableResult, ArtifactError> {
        let artifact_dir = self.base_dir.join(Uuid::new_v4().to_string());
        fs::create_dir_all(&artifact_dir)
            .await
            .map_err(|e| ArtifactError::IoError(e.to_string()))?;

        let path = artifact_dir.join(Self::safe_file_name(file_name));
        fs::write(&path, &bytes)
            .await
            .map_err(|e| ArtifactError::IoError(e.to_string()))?;

        let handle = format!("file://{}", path.display());
        self.artifacts.insert(handle.clone(), path);

        tracing::debug!(handle = %handle, size = bytes.len(), "Saved artifact");

        Ok(DownloadableResult {
            handle,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len() as u64,
        })
    }

    async fn read(&self, handle: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self
            .path_of(handle)
            .ok_or_else(|| ArtifactError::NotFound(handle.to_string()))?;

        fs::read(&path)
            .await
            .map_err(|e| ArtifactError::IoError(e.to_string()))
    }

    fn release(&self, handle: &str) -> Result<bool, ArtifactError> {
        let Some((_, path)) = self.artifacts.remove(handle) else {
            return Ok(false);
        };

        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| ArtifactError::IoError(e.to_string()))?;
        }
        // 尝试删除空目录
        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir(parent);
        }

        tracing::debug!(handle = %handle, "Deleted artifact");
        Ok(true)
    }

    fn live_count(&self) -> usize {
        self.artifacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_materialize_read_release() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let result = store
            .materialize(b"1\n00:00:01,000 --> 00:00:02,000\nHallo\n".to_vec(), "application/x-subrip", "movie_german.srt")
            .await
            .unwrap();
        assert!(result.handle.starts_with("file://"));

        let path = store.path_of(&result.handle).unwrap();
        assert!(path.exists());
        assert!(path.starts_with(temp_dir.path()));
        assert_eq!(path.file_name().unwrap(), "movie_german.srt");

        let bytes = store.read(&result.handle).await.unwrap();
        assert_eq!(bytes.len() as u64, result.size);

        assert!(store.release(&result.handle).unwrap());
        assert!(!path.exists());
        assert!(!store.release(&result.handle).unwrap());
        assert_eq!(store.live_count(), 0);
    }

    #[tokio::test]
    async fn test_file_name_cannot_escape_base_dir() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let result = store
            .materialize(b"x".to_vec(), "application/x-subrip", "../../etc/passwd")
            .await
            .unwrap();

        let path = store.path_of(&result.handle).unwrap();
        assert!(path.starts_with(temp_dir.path()));
        assert_eq!(path.file_name().unwrap(), "passwd");
    }
}
