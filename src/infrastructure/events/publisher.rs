//! Event Publisher Implementation
//!
//! 基于 tokio broadcast 的控制器事件推送

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::DownloadableResult;
use crate::domain::job::{JobId, JobStatus};

/// 控制器事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ControllerEvent {
    /// 状态消息变更（空字符串表示清空）
    StatusChanged { message: String },
    /// 任务被异步受理
    JobAccepted { job_id: String },
    /// 任务状态变更
    JobStateChanged {
        job_id: String,
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// 轮询循环停止
    PollingStopped { job_id: String },
    /// 下载资源就绪
    DownloadReady {
        handle: String,
        file_name: String,
        size: u64,
    },
    /// 下载资源已释放
    DownloadReleased { handle: String },
    /// 参考数据加载完成
    ReferenceDataLoaded { count: usize },
    /// 参考数据加载失败
    ReferenceDataFailed { error: String },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<ControllerEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅控制器事件
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.channel.subscribe()
    }

    pub fn publish_status(&self, message: &str) {
        self.publish(ControllerEvent::StatusChanged {
            message: message.to_string(),
        });
    }

    pub fn publish_job_accepted(&self, job_id: &JobId) {
        self.publish(ControllerEvent::JobAccepted {
            job_id: job_id.to_string(),
        });
    }

    pub fn publish_job_state(&self, job_id: &JobId, status: &JobStatus, error: Option<&str>) {
        self.publish(ControllerEvent::JobStateChanged {
            job_id: job_id.to_string(),
            status: status.as_str().to_string(),
            error: error.map(str::to_string),
        });
    }

    pub fn publish_polling_stopped(&self, job_id: &JobId) {
        self.publish(ControllerEvent::PollingStopped {
            job_id: job_id.to_string(),
        });
    }

    pub fn publish_download_ready(&self, download: &DownloadableResult) {
        self.publish(ControllerEvent::DownloadReady {
            handle: download.handle.clone(),
            file_name: download.file_name.clone(),
            size: download.size,
        });
    }

    pub fn publish_download_released(&self, handle: &str) {
        self.publish(ControllerEvent::DownloadReleased {
            handle: handle.to_string(),
        });
    }

    pub fn publish_reference_loaded(&self, count: usize) {
        self.publish(ControllerEvent::ReferenceDataLoaded { count });
    }

    pub fn publish_reference_failed(&self, error: &str) {
        self.publish(ControllerEvent::ReferenceDataFailed {
            error: error.to_string(),
        });
    }

    /// 没有订阅者时发送失败，不视为错误
    fn publish(&self, event: ControllerEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        let job_id = JobId::new("42").unwrap();
        publisher.publish_job_accepted(&job_id);
        publisher.publish_job_state(&job_id, &JobStatus::Failed, Some("quota exceeded"));

        assert_eq!(
            rx.recv().await.unwrap(),
            ControllerEvent::JobAccepted {
                job_id: "42".to_string()
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            ControllerEvent::JobStateChanged {
                job_id: "42".to_string(),
                status: "FAILED".to_string(),
                error: Some("quota exceeded".to_string()),
            }
        );
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let publisher = EventPublisher::new();
        publisher.publish_status("Starting translation...");
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = ControllerEvent::DownloadReleased {
            handle: "artifact://1".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "DownloadReleased");
        assert_eq!(json["data"]["handle"], "artifact://1");
    }
}
