//! Fake Translation Client - 可编排响应的翻译客户端
//!
//! 不发起网络请求，按顺序返回预先排好的响应；用于测试与离线演示

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::application::ports::{
    ApiError, ApiReply, CreateJobData, CreateJobRequest, JobStatusData, TranslationApiPort,
};
use crate::domain::job::JobId;
use crate::domain::reference::ReferenceOption;

type Scripted<T> = Mutex<VecDeque<Result<ApiReply<T>, ApiError>>>;

/// Fake Translation Client
///
/// 队列耗尽后：国家列表返回空列表，创建任务返回 202 + job "1"，
/// 状态查询返回 PENDING
#[derive(Default)]
pub struct FakeTranslationClient {
    countries: Scripted<Vec<ReferenceOption>>,
    create_replies: Scripted<CreateJobData>,
    job_replies: Scripted<JobStatusData>,
    /// 每次提交前的模拟延迟
    create_delay: Option<Duration>,
    /// 每次状态查询前的模拟延迟
    poll_delay: Option<Duration>,
    submitted: Mutex<Vec<CreateJobRequest>>,
    polled: Mutex<Vec<JobId>>,
    country_calls: AtomicUsize,
    healthy: bool,
}

impl FakeTranslationClient {
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = Some(delay);
        self
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    pub async fn push_countries(&self, reply: Result<ApiReply<Vec<ReferenceOption>>, ApiError>) {
        self.countries.lock().await.push_back(reply);
    }

    pub async fn push_create(&self, reply: Result<ApiReply<CreateJobData>, ApiError>) {
        self.create_replies.lock().await.push_back(reply);
    }

    pub async fn push_job(&self, reply: Result<ApiReply<JobStatusData>, ApiError>) {
        self.job_replies.lock().await.push_back(reply);
    }

    /// 已收到的提交请求
    pub async fn submitted(&self) -> Vec<CreateJobRequest> {
        self.submitted.lock().await.clone()
    }

    /// 已收到的状态查询（按顺序）
    pub async fn polled(&self) -> Vec<JobId> {
        self.polled.lock().await.clone()
    }

    pub async fn poll_count(&self) -> usize {
        self.polled.lock().await.len()
    }

    pub fn country_calls(&self) -> usize {
        self.country_calls.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // 常用响应构造
    // ------------------------------------------------------------------

    pub fn countries_reply(options: &[(&str, &str)]) -> ApiReply<Vec<ReferenceOption>> {
        ApiReply::new(
            200,
            Some("Countries loaded.".to_string()),
            Some(
                options
                    .iter()
                    .map(|(code, name)| ReferenceOption::new(*code, *name))
                    .collect(),
            ),
        )
    }

    pub fn accepted_reply(job_id: &str) -> ApiReply<CreateJobData> {
        ApiReply::new(
            202,
            Some("Translation job started.".to_string()),
            Some(CreateJobData {
                job_id: Some(job_id.to_string()),
                ..Default::default()
            }),
        )
    }

    pub fn status_reply(status: &str) -> ApiReply<JobStatusData> {
        ApiReply::new(
            200,
            Some("Job status retrieved.".to_string()),
            Some(JobStatusData {
                status: Some(status.to_string()),
                ..Default::default()
            }),
        )
    }

    pub fn completed_reply(content_base64: Option<&str>, output_file_name: &str) -> ApiReply<JobStatusData> {
        ApiReply::new(
            200,
            Some("Job status retrieved.".to_string()),
            Some(JobStatusData {
                status: Some("COMPLETED".to_string()),
                output_file_name: Some(output_file_name.to_string()),
                content_base64: content_base64.map(str::to_string),
                ..Default::default()
            }),
        )
    }

    pub fn failed_reply(error_message: Option<&str>) -> ApiReply<JobStatusData> {
        ApiReply::new(
            200,
            Some("Job status retrieved.".to_string()),
            Some(JobStatusData {
                status: Some("FAILED".to_string()),
                error_message: error_message.map(str::to_string),
                ..Default::default()
            }),
        )
    }

    pub fn error_reply<T>(status: u16, message: Option<&str>) -> ApiReply<T> {
        ApiReply::new(status, message.map(str::to_string), None)
    }
}

#[async_trait]
impl TranslationApiPort for FakeTranslationClient {
    async fn list_countries(&self) -> Result<ApiReply<Vec<ReferenceOption>>, ApiError> {
        self.country_calls.fetch_add(1, Ordering::SeqCst);
        self.countries
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(ApiReply::new(200, None, Some(Vec::new()))))
    }

    async fn create_job(
        &self,
        request: CreateJobRequest,
    ) -> Result<ApiReply<CreateJobData>, ApiError> {
        tracing::debug!(file = %request.file.name(), "FakeTranslationClient: create_job");
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        self.submitted.lock().await.push(request);
        self.create_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Self::accepted_reply("1")))
    }

    async fn get_job(&self, job_id: &JobId) -> Result<ApiReply<JobStatusData>, ApiError> {
        if let Some(delay) = self.poll_delay {
            tokio::time::sleep(delay).await;
        }
        self.polled.lock().await.push(job_id.clone());
        self.job_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Self::status_reply("PENDING")))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}
