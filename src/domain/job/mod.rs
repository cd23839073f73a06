//! Job Context - 翻译任务限界上下文
//!
//! 职责:
//! - 任务状态机（PENDING → PROCESSING → COMPLETED / FAILED）
//! - 待上传字幕文件的校验

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::Job;
pub use errors::JobError;
pub use value_objects::{JobId, JobStatus, SubtitleFile};
