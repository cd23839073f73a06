//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod events;
pub mod memory;

pub use adapters::{FakeTranslationClient, FileArtifactStore, HttpTranslationClient};
pub use events::{ControllerEvent, EventPublisher};
pub use memory::InMemoryArtifactStore;
