//! Reference Context - 目标语言参考数据
//!
//! 启动时加载一次，之后只读

mod value_objects;

pub use value_objects::{ReferenceDataState, ReferenceOption};
