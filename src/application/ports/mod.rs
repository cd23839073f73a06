//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod translation_api;

pub use artifact_store::{ArtifactError, ArtifactStorePort, DownloadableResult};
pub use translation_api::{
    ApiError, ApiReply, CreateJobData, CreateJobRequest, JobStatusData, TranslationApiPort,
};
