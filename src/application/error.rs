//! 应用层错误定义
//!
//! 提交 / 轮询边界上的统一错误类型，最终都转换为一条用户可见的状态消息

use thiserror::Error;

use crate::application::ports::{ApiError, ArtifactError};
use crate::domain::job::JobError;

/// 控制器错误
#[derive(Debug, Error)]
pub enum ControllerError {
    /// 前置条件不满足（未选择文件、目标语言不可用等），不发起网络请求
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 请求无法送达
    #[error("Network error: {0}")]
    NetworkError(String),

    /// HTTP 响应格式正确但缺少预期字段
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// 非 2xx 响应
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// 本地下载资源读写失败
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ControllerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError(message.into())
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// 写入状态消息的文本
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationError(msg) | Self::ProtocolError(msg) => msg.clone(),
            Self::ServerError { message, .. } => message.clone(),
            Self::NetworkError(msg) => {
                format!("Unable to reach the translation service: {}", msg)
            }
            Self::StorageError(msg) => format!("Failed to prepare the download: {}", msg),
        }
    }
}

impl From<ApiError> for ControllerError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NetworkError(msg) => Self::NetworkError(msg),
            ApiError::Timeout => Self::NetworkError("request timed out".to_string()),
            ApiError::InvalidRequest(msg) | ApiError::InvalidResponse(msg) => {
                Self::ProtocolError(msg)
            }
        }
    }
}

impl From<JobError> for ControllerError {
    fn from(err: JobError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ArtifactError> for ControllerError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Decode(msg) => {
                Self::ProtocolError(format!("Translated content could not be decoded: {}", msg))
            }
            other => Self::StorageError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_server_error_is_verbatim() {
        let err = ControllerError::server(400, "Only .srt files are supported.");
        assert_eq!(err.user_message(), "Only .srt files are supported.");
    }

    #[test]
    fn test_api_error_mapping() {
        assert!(matches!(
            ControllerError::from(ApiError::Timeout),
            ControllerError::NetworkError(_)
        ));
        assert!(matches!(
            ControllerError::from(ApiError::InvalidResponse("bad json".into())),
            ControllerError::ProtocolError(_)
        ));
    }

    #[test]
    fn test_decode_failure_is_protocol_error() {
        let err = ControllerError::from(ArtifactError::Decode("Invalid byte 33".into()));
        assert!(matches!(err, ControllerError::ProtocolError(_)));
    }
}
