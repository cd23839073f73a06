//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 翻译服务配置
    #[serde(default)]
    pub api: ApiConfig,

    /// 轮询配置
    #[serde(default)]
    pub polling: PollingConfig,

    /// 上传配置
    #[serde(default)]
    pub upload: UploadConfig,

    /// 下载资源配置
    #[serde(default)]
    pub artifacts: ArtifactConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 翻译服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 服务基础 URL，为空表示未配置
    #[serde(default)]
    pub base_url: String,

    /// 宿主页面是否通过 HTTPS 提供；为 true 时 http:// 地址会升级为 https://
    #[serde(default)]
    pub page_secure: bool,

    /// 请求超时时间（秒）
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            page_secure: false,
            timeout_secs: default_api_timeout(),
        }
    }
}

impl ApiConfig {
    /// 规范化后的 Base URL
    pub fn resolved_base_url(&self) -> String {
        crate::infrastructure::adapters::resolve_base_url(&self.base_url, self.page_secure)
    }
}

/// 轮询配置
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// 轮询间隔（毫秒）
    #[serde(default = "default_poll_interval")]
    pub interval_ms: u64,
}

fn default_poll_interval() -> u64 {
    2000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval(),
        }
    }
}

/// 上传配置（与服务端限制保持一致）
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// 上传文件最大大小（字节），默认 2MB
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// 允许的扩展名
    #[serde(default = "default_allowed_extension")]
    pub allowed_extension: String,
}

fn default_max_file_bytes() -> u64 {
    2 * 1024 * 1024 // 2 MB
}

fn default_allowed_extension() -> String {
    "srt".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            allowed_extension: default_allowed_extension(),
        }
    }
}

/// 下载资源存储方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStoreKind {
    #[default]
    Memory,
    File,
}

/// 下载资源配置
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// 翻译结果的内容类型
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// 服务端未返回文件名时使用
    #[serde(default = "default_output_name")]
    pub default_output_name: String,

    /// 存储方式
    #[serde(default)]
    pub store: ArtifactStoreKind,

    /// store = file 时的暂存目录
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// 下载动作的默认目标目录
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

fn default_content_type() -> String {
    "application/x-subrip".to_string()
}

fn default_output_name() -> String {
    "translated.srt".to_string()
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("data/artifacts")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            content_type: default_content_type(),
            default_output_name: default_output_name(),
            store: ArtifactStoreKind::default(),
            scratch_dir: default_scratch_dir(),
            download_dir: default_download_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.api.base_url.is_empty());
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.polling.interval_ms, 2000);
        assert_eq!(config.upload.max_file_bytes, 2 * 1024 * 1024);
        assert_eq!(config.artifacts.default_output_name, "translated.srt");
        assert_eq!(config.artifacts.store, ArtifactStoreKind::Memory);
    }

    #[test]
    fn test_resolved_base_url() {
        let config = ApiConfig {
            base_url: "http://translator.local/".to_string(),
            page_secure: true,
            timeout_secs: 30,
        };
        assert_eq!(config.resolved_base_url(), "https://translator.local");
    }
}
