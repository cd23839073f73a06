//! Events - 控制器事件推送
//!
//! UI 通过订阅广播通道获取状态变化

mod publisher;

pub use publisher::{ControllerEvent, EventPublisher};
