//! 组装控制器
//!
//! 按配置创建 HTTP 翻译客户端、下载资源存储与事件发布器

use std::sync::Arc;

use crate::application::controller::{ControllerSettings, TranslationController};
use crate::application::error::ControllerError;
use crate::application::ports::ArtifactStorePort;
use crate::config::{AppConfig, ArtifactStoreKind};
use crate::infrastructure::adapters::{
    FileArtifactStore, HttpTranslationClient, HttpTranslationClientConfig,
};
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::memory::InMemoryArtifactStore;

/// 根据配置创建下载资源存储
pub async fn build_artifact_store(
    config: &AppConfig,
) -> Result<Arc<dyn ArtifactStorePort>, ControllerError> {
    let store: Arc<dyn ArtifactStorePort> = match config.artifacts.store {
        ArtifactStoreKind::Memory => Arc::new(InMemoryArtifactStore::new()),
        ArtifactStoreKind::File => {
            Arc::new(FileArtifactStore::new(&config.artifacts.scratch_dir).await?)
        }
    };
    Ok(store)
}

/// 创建连接真实翻译服务的控制器
///
/// 不会加载参考数据，调用方应随后执行 `load_reference_data`
pub async fn build_controller(
    config: &AppConfig,
) -> Result<Arc<TranslationController>, ControllerError> {
    let client_config = HttpTranslationClientConfig::new(config.api.base_url.clone())
        .with_page_secure(config.api.page_secure)
        .with_timeout(config.api.timeout_secs);
    let api = Arc::new(HttpTranslationClient::new(client_config)?);

    let store = build_artifact_store(config).await?;
    let events = Arc::new(EventPublisher::new());
    let settings = ControllerSettings::from_config(config);

    tracing::info!(
        base_url = %api.base_url(),
        poll_interval_ms = settings.poll_interval.as_millis() as u64,
        "Translation controller ready"
    );

    Ok(TranslationController::new(api, store, events, settings).arc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_controller_without_base_url_reports_missing_config() {
        let controller = build_controller(&AppConfig::default()).await.unwrap();
        let state = controller.load_reference_data().await;
        assert_eq!(
            state,
            crate::domain::reference::ReferenceDataState::Error(
                "API base URL is not configured.".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_build_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.artifacts.store = ArtifactStoreKind::File;
        config.artifacts.scratch_dir = dir.path().join("artifacts");

        let store = build_artifact_store(&config).await.unwrap();
        assert_eq!(store.live_count(), 0);
        assert!(dir.path().join("artifacts").is_dir());
    }
}
