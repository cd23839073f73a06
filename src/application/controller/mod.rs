//! Translation Controller - 客户端翻译任务生命周期控制器
//!
//! 职责:
//! - 提交字幕文件（submission）
//! - 轮询异步任务状态（polling）
//! - 释放过期状态与下载资源（lifecycle）
//! - 加载目标语言参考数据（reference）
//!
//! 所有状态集中在一把 `std::sync::Mutex` 中，锁从不跨 `.await` 持有；
//! 网络请求在锁外进行，结果回到锁内前先检查 generation / loop_id，
//! 被取代的提交或轮询结果一律丢弃。

pub mod messages;

mod lifecycle;
mod polling;
mod reference;
mod submission;


use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::decoder::ArtifactDecoder;
use crate::application::ports::{ArtifactStorePort, DownloadableResult, TranslationApiPort};
use crate::config::AppConfig;
use crate::domain::job::{Job, JobId, JobStatus, SubtitleFile};
use crate::domain::reference::ReferenceDataState;
use crate::infrastructure::events::EventPublisher;

pub use submission::SubmissionOutcome;

/// 控制器运行参数
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// 轮询间隔
    pub poll_interval: Duration,
    /// 下载资源的内容类型
    pub content_type: String,
    /// 服务端未给出输出文件名时使用
    pub default_output_name: String,
    /// 允许上传的扩展名（不含点）
    pub allowed_extension: String,
    /// 上传文件大小上限（字节）
    pub max_file_bytes: u64,
    /// 下载动作的默认目标目录
    pub download_dir: PathBuf,
    /// 是否配置了服务端地址；未配置时参考数据直接进入 Error
    pub api_configured: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            content_type: "application/x-subrip".to_string(),
            default_output_name: "translated.srt".to_string(),
            allowed_extension: "srt".to_string(),
            max_file_bytes: 2 * 1024 * 1024,
            download_dir: PathBuf::from("downloads"),
            api_configured: true,
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.polling.interval_ms),
            content_type: config.artifacts.content_type.clone(),
            default_output_name: config.artifacts.default_output_name.clone(),
            allowed_extension: config.upload.allowed_extension.clone(),
            max_file_bytes: config.upload.max_file_bytes,
            download_dir: config.artifacts.download_dir.clone(),
            api_configured: !config.api.base_url.trim().is_empty(),
        }
    }
}

/// 正在运行的轮询循环
struct PollingLoop {
    job_id: JobId,
    loop_id: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// 控制器内部状态
struct ControllerState {
    selected_file: Option<SubtitleFile>,
    /// 目标语言代码
    target_language: Option<String>,
    reference: ReferenceDataState,
    job: Option<Job>,
    download: Option<DownloadableResult>,
    status_message: String,
    in_flight: bool,
    /// 每次释放旧状态时递增，用于丢弃被取代的提交结果
    generation: u64,
    /// 仍在等待响应的提交所属的 generation
    submitting: Option<u64>,
    next_loop_id: u64,
    polling: Option<PollingLoop>,
    shut_down: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            selected_file: None,
            target_language: None,
            reference: ReferenceDataState::Loading,
            job: None,
            download: None,
            status_message: String::new(),
            in_flight: false,
            generation: 0,
            submitting: None,
            next_loop_id: 0,
            polling: None,
            shut_down: false,
        }
    }
}

/// 翻译任务控制器
///
/// 同一时刻最多跟踪一个 Job、一个轮询循环、一个可下载结果
pub struct TranslationController {
    api: Arc<dyn TranslationApiPort>,
    decoder: ArtifactDecoder,
    events: Arc<EventPublisher>,
    settings: ControllerSettings,
    state: Mutex<ControllerState>,
}

impl TranslationController {
    pub fn new(
        api: Arc<dyn TranslationApiPort>,
        store: Arc<dyn ArtifactStorePort>,
        events: Arc<EventPublisher>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            api,
            decoder: ArtifactDecoder::new(store),
            events,
            settings,
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        // 锁内没有会 panic 的路径；即使中毒也继续使用内部状态
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_status(&self, state: &mut ControllerState, message: impl Into<String>) {
        let message = message.into();
        if state.status_message == message {
            return;
        }
        state.status_message = message;
        self.events.publish_status(&state.status_message);
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn events(&self) -> &Arc<EventPublisher> {
        &self.events
    }

    /// 当前状态消息（空字符串表示无消息）
    pub fn status_message(&self) -> String {
        self.state().status_message.clone()
    }

    pub fn job(&self) -> Option<Job> {
        self.state().job.clone()
    }

    pub fn job_status(&self) -> Option<JobStatus> {
        self.state().job.as_ref().map(|job| job.status().clone())
    }

    pub fn download(&self) -> Option<DownloadableResult> {
        self.state().download.clone()
    }

    /// 提交请求或其轮询仍在进行中
    pub fn is_submitting(&self) -> bool {
        self.state().in_flight
    }

    pub fn is_polling(&self) -> bool {
        self.state().polling.is_some()
    }

    pub fn polling_job_id(&self) -> Option<JobId> {
        self.state().polling.as_ref().map(|p| p.job_id.clone())
    }

    pub fn selected_file_name(&self) -> Option<String> {
        self.state()
            .selected_file
            .as_ref()
            .map(|file| file.name().to_string())
    }

    pub fn reference_data(&self) -> ReferenceDataState {
        self.state().reference.clone()
    }

    pub fn target_language(&self) -> Option<String> {
        self.state().target_language.clone()
    }

    /// 检查翻译服务是否可用
    pub async fn service_healthy(&self) -> bool {
        self.api.health_check().await
    }
}
