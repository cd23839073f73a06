//! Subtrans - 字幕翻译任务客户端
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Job: 翻译任务、任务状态、字幕文件
//! - Reference: 目标语言参考数据
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TranslationApi, ArtifactStore）
//! - Decoder: base64 结果解码
//! - Controller: 提交、轮询、资源释放、参考数据加载
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP / Fake 翻译客户端、文件下载资源存储
//! - Memory: 内存下载资源存储
//! - Events: 控制器事件发布

pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{ControllerError, SubmissionOutcome, TranslationController};
pub use bootstrap::build_controller;
pub use config::{load_config, AppConfig};
