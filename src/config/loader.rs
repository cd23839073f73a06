//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, ArtifactStoreKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `SUBTRANS_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `SUBTRANS_API__BASE_URL=https://translator.example.com`
/// - `SUBTRANS_API__PAGE_SECURE=true`
/// - `SUBTRANS_POLLING__INTERVAL_MS=2000`
/// - `SUBTRANS_ARTIFACTS__STORE=file`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("api.base_url", "")?
        .set_default("api.page_secure", false)?
        .set_default("api.timeout_secs", 30)?
        .set_default("polling.interval_ms", 2000)?
        .set_default("upload.max_file_bytes", 2 * 1024 * 1024)?
        .set_default("upload.allowed_extension", "srt")?
        .set_default("artifacts.content_type", "application/x-subrip")?
        .set_default("artifacts.default_output_name", "translated.srt")?
        .set_default("artifacts.store", "memory")?
        .set_default("artifacts.scratch_dir", "data/artifacts")?
        .set_default("artifacts.download_dir", "downloads")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: SUBTRANS_API__BASE_URL=http://localhost:8080
    builder = builder.add_source(
        Environment::with_prefix("SUBTRANS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.polling.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Polling interval cannot be 0".to_string(),
        ));
    }

    if config.upload.max_file_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Upload size limit cannot be 0".to_string(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "API timeout cannot be 0".to_string(),
        ));
    }

    // 允许为空（界面会提示未配置），但非空时必须是 HTTP(S) 地址
    let base_url = config.api.base_url.trim().to_ascii_lowercase();
    if !base_url.is_empty() && !base_url.starts_with("http://") && !base_url.starts_with("https://")
    {
        return Err(ConfigError::ValidationError(format!(
            "API base URL must start with http:// or https://: {}",
            config.api.base_url
        )));
    }

    if config.artifacts.default_output_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Default output file name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    if config.api.base_url.trim().is_empty() {
        tracing::info!("API Base URL: <not configured>");
    } else {
        tracing::info!("API Base URL: {}", config.api.resolved_base_url());
    }
    tracing::info!("API Timeout: {}s", config.api.timeout_secs);
    tracing::info!("Polling Interval: {}ms", config.polling.interval_ms);
    tracing::info!(
        "Upload Limit: {} bytes (.{})",
        config.upload.max_file_bytes,
        config.upload.allowed_extension
    );
    match config.artifacts.store {
        ArtifactStoreKind::Memory => tracing::info!("Artifact Store: memory"),
        ArtifactStoreKind::File => {
            tracing::info!("Artifact Store: file ({:?})", config.artifacts.scratch_dir)
        }
    }
    tracing::info!("Download Directory: {:?}", config.artifacts.download_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
