//! Translation API Port - 远程翻译服务抽象
//!
//! 定义翻译服务的抽象接口，具体实现在 infrastructure/adapters 层。
//! 端口只负责传输，HTTP 状态码的业务解释由控制器完成

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::job::{JobId, SubtitleFile};
use crate::domain::reference::ReferenceOption;

/// 翻译服务传输错误
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 服务端回复：状态码 + 统一信封中的 message / data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply<T> {
    pub status: u16,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiReply<T> {
    pub fn new(status: u16, message: Option<String>, data: Option<T>) -> Self {
        Self {
            status,
            message,
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 202 Accepted：任务已异步受理
    pub fn is_accepted(&self) -> bool {
        self.status == 202
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiReply<U> {
        ApiReply {
            status: self.status,
            message: self.message,
            data: self.data.map(f),
        }
    }

    /// 服务端消息（忽略空白）
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// 创建翻译任务请求
#[derive(Debug, Clone)]
pub struct CreateJobRequest {
    pub file: SubtitleFile,
    /// 目标语言显示名称
    pub target_language: Option<String>,
}

/// 创建任务的响应数据（202 时只有 job_id，旧版同步 200 时带内容）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateJobData {
    pub job_id: Option<String>,
    pub content_base64: Option<String>,
    pub output_file_name: Option<String>,
}

/// 任务状态查询的响应数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatusData {
    pub job_id: Option<String>,
    pub status: Option<String>,
    pub input_file_name: Option<String>,
    pub output_file_name: Option<String>,
    pub content_base64: Option<String>,
    pub error_message: Option<String>,
}

/// Translation API Port
#[async_trait]
pub trait TranslationApiPort: Send + Sync {
    /// GET /api/reference/countries
    async fn list_countries(&self) -> Result<ApiReply<Vec<ReferenceOption>>, ApiError>;

    /// POST /api/translation-jobs (multipart)
    async fn create_job(&self, request: CreateJobRequest)
        -> Result<ApiReply<CreateJobData>, ApiError>;

    /// GET /api/translation-jobs/{jobId}
    async fn get_job(&self, job_id: &JobId) -> Result<ApiReply<JobStatusData>, ApiError>;

    /// 检查服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_status_classes() {
        let accepted: ApiReply<()> = ApiReply::new(202, None, None);
        assert!(accepted.is_success());
        assert!(accepted.is_accepted());

        let not_found: ApiReply<()> = ApiReply::new(404, Some("Job not found.".into()), None);
        assert!(!not_found.is_success());
        assert_eq!(not_found.message(), Some("Job not found."));
    }

    #[test]
    fn test_blank_message_is_ignored() {
        let reply: ApiReply<()> = ApiReply::new(500, Some("   ".into()), None);
        assert_eq!(reply.message(), None);
    }
}
