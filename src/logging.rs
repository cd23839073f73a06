//! 日志初始化
//!
//! `RUST_LOG` 优先；否则使用配置中的级别，并对本 crate 应用同一级别

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// 默认过滤规则
pub fn default_filter(config: &LogConfig) -> String {
    format!("{},subtrans={}", config.level, config.level)
}

/// 安装全局 tracing subscriber
///
/// 已安装过时返回 false（重复调用无副作用）
pub fn init_tracing(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let result = if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let config = LogConfig {
            level: "debug".to_string(),
            json: false,
        };
        assert_eq!(default_filter(&config), "debug,subtrans=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default();
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
