//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TranslationApi、ArtifactStore）
//! - decoder: 翻译结果解码
//! - controller: 任务生命周期控制器
//! - error: 应用层错误定义

pub mod controller;
pub mod decoder;
pub mod error;
pub mod ports;

pub use controller::{ControllerSettings, SubmissionOutcome, TranslationController};
pub use decoder::{decode_content, ArtifactDecoder};
pub use error::ControllerError;
pub use ports::{
    ApiError, ApiReply, ArtifactError, ArtifactStorePort, CreateJobData, CreateJobRequest,
    DownloadableResult, JobStatusData, TranslationApiPort,
};
