//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Job Context: 翻译任务（状态机、字幕文件）
//! - Reference Context: 目标语言参考数据

pub mod job;
pub mod reference;
