//! Job Polling Engine
//!
//! 每个 Job 至多一个轮询循环。循环先立即查询一次，之后每隔 `poll_interval`
//! 查询一次；每次查询都 await 完成后才开始下一次等待，不存在重叠请求。
//!
//! 停止循环会取消 token、abort 任务并清空句柄；循环回写结果前检查自己
//! 的 loop_id 仍是当前循环，否则丢弃结果。

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{messages, ControllerState, PollingLoop, TranslationController};
use crate::application::error::ControllerError;
use crate::application::ports::{DownloadableResult, JobStatusData};
use crate::domain::job::{Job, JobId, JobStatus};

impl TranslationController {
    /// 开始轮询指定 Job，替换已有的循环
    ///
    /// # Panics
    ///
    /// 轮询任务通过 `tokio::spawn` 启动，必须在 tokio 运行时内调用
    pub fn start_polling(self: &Arc<Self>, job_id: JobId) {
        let mut state = self.state();
        if state.shut_down {
            tracing::warn!(job_id = %job_id, "Controller shut down, not starting polling");
            return;
        }
        let tracks_job = state.job.as_ref().map_or(false, |job| job.id() == &job_id);
        if !tracks_job {
            state.job = Some(Job::accepted(job_id.clone()));
        }
        state.in_flight = true;
        self.start_polling_locked(&mut state, job_id);
    }

    /// 停止当前轮询（幂等）
    pub fn stop_polling(&self) {
        let mut state = self.state();
        if self.stop_polling_locked(&mut state) {
            state.in_flight = false;
        }
    }

    pub(super) fn start_polling_locked(self: &Arc<Self>, state: &mut ControllerState, job_id: JobId) {
        self.stop_polling_locked(state);

        state.next_loop_id += 1;
        let loop_id = state.next_loop_id;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_polling_loop(
            Arc::downgrade(self),
            job_id.clone(),
            loop_id,
            cancel.clone(),
            self.settings.poll_interval,
        ));

        tracing::info!(job_id = %job_id, loop_id, "Polling started");
        state.polling = Some(PollingLoop {
            job_id,
            loop_id,
            cancel,
            handle,
        });
    }

    /// 返回是否确实停止了一个循环
    pub(super) fn stop_polling_locked(&self, state: &mut ControllerState) -> bool {
        let Some(polling) = state.polling.take() else {
            return false;
        };
        polling.cancel.cancel();
        polling.handle.abort();
        tracing::info!(job_id = %polling.job_id, loop_id = polling.loop_id, "Polling stopped");
        self.events.publish_polling_stopped(&polling.job_id);
        true
    }

    fn is_active_loop(state: &ControllerState, loop_id: u64) -> bool {
        state
            .polling
            .as_ref()
            .map_or(false, |polling| polling.loop_id == loop_id)
    }

    /// 查询一次状态并应用迁移，返回循环是否应继续
    async fn poll_once(&self, job_id: &JobId, loop_id: u64) -> bool {
        let reply = match self.api.get_job(job_id).await {
            Ok(reply) => reply,
            Err(e) => {
                self.finish_with_error(job_id, loop_id, e.into());
                return false;
            }
        };

        if !reply.is_success() {
            let message = reply
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| messages::poll_failed(reply.status));
            self.finish_with_error(job_id, loop_id, ControllerError::server(reply.status, message));
            return false;
        }

        let data = reply.data.unwrap_or_default();
        let Some(raw_status) = data.status.as_deref() else {
            self.finish_with_error(job_id, loop_id, ControllerError::protocol(messages::STATUS_MISSING));
            return false;
        };

        match JobStatus::parse(raw_status) {
            JobStatus::Completed => {
                self.complete(job_id, loop_id, data).await;
                false
            }
            JobStatus::Failed => {
                let message = data
                    .error_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| messages::FAILED.to_string());
                self.fail(job_id, loop_id, message);
                false
            }
            status => self.apply_progress(job_id, loop_id, status),
        }
    }

    fn apply_progress(&self, job_id: &JobId, loop_id: u64, status: JobStatus) -> bool {
        let mut state = self.state();
        if !Self::is_active_loop(&state, loop_id) {
            tracing::debug!(job_id = %job_id, loop_id, "Discarding stale poll result");
            return false;
        }

        let changed = state
            .job
            .as_mut()
            .map_or(false, |job| job.transition(status.clone()));
        if changed {
            tracing::info!(job_id = %job_id, status = %status, "Job state changed");
            self.events.publish_job_state(job_id, &status, None);
        }

        match status {
            JobStatus::Pending => self.set_status(&mut state, messages::QUEUED),
            JobStatus::Processing => self.set_status(&mut state, messages::IN_PROGRESS),
            other => {
                tracing::warn!(job_id = %job_id, status = %other, "Unrecognized job status, still polling");
            }
        }
        true
    }

    async fn complete(&self, job_id: &JobId, loop_id: u64, data: JobStatusData) {
        let output_name = data
            .output_file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.settings.default_output_name.clone());

        // 解码在锁外进行，结果回写前再确认循环仍然有效
        let download = match data.content_base64.filter(|c| !c.trim().is_empty()) {
            Some(content) => {
                match self
                    .decoder
                    .decode(&content, &self.settings.content_type, &output_name)
                    .await
                {
                    Ok(download) => Some(download),
                    Err(e) => {
                        self.finish_with_error(job_id, loop_id, e.into());
                        return;
                    }
                }
            }
            None => None,
        };

        let mut state = self.state();
        if !Self::is_active_loop(&state, loop_id) {
            tracing::debug!(job_id = %job_id, loop_id, "Discarding stale completion");
            if let Some(download) = download {
                self.discard_artifact(&download);
            }
            return;
        }

        self.stop_polling_locked(&mut state);
        state.in_flight = false;
        if let Some(job) = state.job.as_mut() {
            job.complete(Some(output_name.clone()));
        }
        self.events.publish_job_state(job_id, &JobStatus::Completed, None);

        match download {
            Some(download) => {
                self.release_download(&mut state);
                tracing::info!(
                    job_id = %job_id,
                    handle = %download.handle,
                    size = download.size,
                    "Translation completed, download ready"
                );
                self.events.publish_download_ready(&download);
                state.download = Some(download);
                self.set_status(&mut state, messages::DOWNLOAD_READY);
            }
            None => {
                tracing::warn!(job_id = %job_id, "Translation completed without content");
                self.set_status(&mut state, messages::COMPLETED_NO_CONTENT);
            }
        }
    }

    fn fail(&self, job_id: &JobId, loop_id: u64, message: String) {
        let mut state = self.state();
        if !Self::is_active_loop(&state, loop_id) {
            tracing::debug!(job_id = %job_id, loop_id, "Discarding stale failure");
            return;
        }

        self.stop_polling_locked(&mut state);
        state.in_flight = false;
        if let Some(job) = state.job.as_mut() {
            job.fail(message.clone());
        }
        tracing::warn!(job_id = %job_id, error = %message, "Translation job failed");
        self.events
            .publish_job_state(job_id, &JobStatus::Failed, Some(&message));
        self.set_status(&mut state, message);
    }

    /// 轮询请求本身失败：终止该 Job，不重试
    fn finish_with_error(&self, job_id: &JobId, loop_id: u64, error: ControllerError) {
        let mut state = self.state();
        if !Self::is_active_loop(&state, loop_id) {
            tracing::debug!(job_id = %job_id, loop_id, error = %error, "Discarding stale poll error");
            return;
        }

        self.stop_polling_locked(&mut state);
        state.in_flight = false;
        tracing::error!(job_id = %job_id, error = %error, "Polling failed");
        self.set_status(&mut state, error.user_message());
    }

    pub(super) fn discard_artifact(&self, download: &DownloadableResult) {
        if let Err(e) = self.decoder.store().release(&download.handle) {
            tracing::warn!(handle = %download.handle, error = %e, "Failed to release stale download");
        }
    }
}

async fn run_polling_loop(
    controller: Weak<TranslationController>,
    job_id: JobId,
    loop_id: u64,
    cancel: CancellationToken,
    interval: Duration,
) {
    loop {
        let Some(this) = controller.upgrade() else {
            break;
        };
        let keep_polling = tokio::select! {
            _ = cancel.cancelled() => false,
            keep = this.poll_once(&job_id, loop_id) => keep,
        };
        drop(this);

        if !keep_polling {
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    tracing::debug!(job_id = %job_id, loop_id, "Polling loop exited");
}
