//! Artifact Store Port - 可下载结果的本地资源
//!
//! 解码后的字节在这里变成一个本地可寻址的句柄（类似 blob URL），
//! 替换或丢弃前必须显式释放

use async_trait::async_trait;
use thiserror::Error;

/// Artifact Store 错误
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Invalid encoded content: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 可下载结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadableResult {
    /// 本地资源句柄，例如 `artifact://<uuid>` 或 `file:///...`
    pub handle: String,
    /// 建议的输出文件名
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

/// Artifact Store Port
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 保存字节并返回新句柄
    async fn materialize(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<DownloadableResult, ArtifactError>;

    /// 读取句柄对应的字节
    async fn read(&self, handle: &str) -> Result<Vec<u8>, ArtifactError>;

    /// 释放句柄（幂等），返回是否确实释放了资源
    ///
    /// 在控制器锁内同步调用，实现不得阻塞过久
    fn release(&self, handle: &str) -> Result<bool, ArtifactError>;

    /// 当前存活的资源数量
    fn live_count(&self) -> usize;
}
