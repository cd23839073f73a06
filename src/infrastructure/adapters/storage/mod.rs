//! Storage Adapter - 文件系统下载资源

mod file_artifact_store;

pub use file_artifact_store::FileArtifactStore;
