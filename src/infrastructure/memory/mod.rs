//! Memory Layer - In-Memory State Management
//!
//! 下载资源的内存实现

mod artifact_store;

pub use artifact_store::InMemoryArtifactStore;
