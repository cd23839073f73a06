//! Job Submission Client
//!
//! 校验前置条件 → 释放旧状态 → multipart 提交 → 解释响应：
//! - 202：异步受理，进入轮询
//! - 其他 2xx：旧版同步完成，可能直接携带内容
//! - 非 2xx：服务端错误

use std::sync::Arc;

use super::{messages, ControllerState, TranslationController};
use crate::application::error::ControllerError;
use crate::application::ports::{CreateJobRequest, DownloadableResult};
use crate::domain::job::{Job, JobId};
use crate::domain::reference::ReferenceDataState;

/// 提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 异步受理，已开始轮询
    Accepted(JobId),
    /// 同步完成并带回内容
    CompletedImmediately(DownloadableResult),
    /// 同步完成但只有消息
    CompletedWithMessage(String),
    /// 已有提交在进行中，本次调用不做任何事
    InFlight,
    /// 请求期间用户切换了文件，结果被丢弃
    Superseded,
}

impl TranslationController {
    /// 提交当前选择的文件和目标语言
    pub async fn submit(self: &Arc<Self>) -> Result<SubmissionOutcome, ControllerError> {
        let (request, generation) = {
            let mut state = self.state();
            if state.in_flight {
                tracing::debug!("Submission already in flight, ignoring");
                return Ok(SubmissionOutcome::InFlight);
            }

            let request = match self.prepare_request(&state) {
                Ok(request) => request,
                Err(e) => {
                    tracing::info!(error = %e, "Submission rejected");
                    self.set_status(&mut state, e.user_message());
                    return Err(e);
                }
            };

            self.release_prior_state(&mut state);
            state.in_flight = true;
            state.submitting = Some(state.generation);
            self.set_status(&mut state, messages::STARTING);
            (request, state.generation)
        };

        tracing::info!(
            file = %request.file.name(),
            size = request.file.len(),
            target_language = ?request.target_language,
            "Submitting translation job"
        );
        let result = self.send_submission(request).await;

        let mut state = self.state();
        if state.generation != generation {
            tracing::debug!("Discarding superseded submission result");
            if let Ok(SubmissionOutcome::CompletedImmediately(download)) = &result {
                self.discard_artifact(download);
            }
            // 没有更新的提交或轮询接手时释放 in-flight 标记
            if state.submitting == Some(generation) {
                state.submitting = None;
                if state.polling.is_none() {
                    state.in_flight = false;
                }
            }
            return Ok(SubmissionOutcome::Superseded);
        }
        state.submitting = None;

        match result {
            Ok(outcome) => {
                self.apply_submission(&mut state, &outcome);
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(error = %e, "Submission failed");
                state.in_flight = false;
                self.set_status(&mut state, e.user_message());
                Err(e)
            }
        }
    }

    fn prepare_request(&self, state: &ControllerState) -> Result<CreateJobRequest, ControllerError> {
        if state.shut_down {
            return Err(ControllerError::validation(messages::SHUT_DOWN));
        }

        let file = state
            .selected_file
            .as_ref()
            .ok_or_else(|| ControllerError::validation(messages::NO_FILE))?;
        file.validate(&self.settings.allowed_extension, self.settings.max_file_bytes)?;

        let target_language = match &state.reference {
            ReferenceDataState::Loading => {
                return Err(ControllerError::validation(messages::REFERENCE_LOADING))
            }
            // 参考数据加载失败：原样展示错误文本，不做静默回退
            ReferenceDataState::Error(message) => {
                return Err(ControllerError::validation(message.clone()))
            }
            ReferenceDataState::Ready(_) => state
                .reference
                .resolve_name(state.target_language.as_deref())
                .ok_or_else(|| ControllerError::validation(messages::NO_TARGET_LANGUAGE))?
                .to_string(),
        };

        Ok(CreateJobRequest {
            file: file.clone(),
            target_language: Some(target_language),
        })
    }

    async fn send_submission(
        &self,
        request: CreateJobRequest,
    ) -> Result<SubmissionOutcome, ControllerError> {
        let reply = self.api.create_job(request).await?;

        if !reply.is_success() {
            let message = reply
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| messages::start_failed(reply.status));
            return Err(ControllerError::server(reply.status, message));
        }

        let message = reply.message().map(str::to_string);
        let data = reply.data.clone().unwrap_or_default();

        if reply.is_accepted() {
            let job_id = data
                .job_id
                .and_then(JobId::new)
                .ok_or_else(|| ControllerError::protocol(messages::JOB_ID_MISSING))?;
            return Ok(SubmissionOutcome::Accepted(job_id));
        }

        match data.content_base64.filter(|c| !c.trim().is_empty()) {
            Some(content) => {
                let output_name = data
                    .output_file_name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| self.settings.default_output_name.clone());
                let download = self
                    .decoder
                    .decode(&content, &self.settings.content_type, &output_name)
                    .await?;
                Ok(SubmissionOutcome::CompletedImmediately(download))
            }
            None => Ok(SubmissionOutcome::CompletedWithMessage(
                message.unwrap_or_else(|| messages::COMPLETED.to_string()),
            )),
        }
    }

    fn apply_submission(self: &Arc<Self>, state: &mut ControllerState, outcome: &SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Accepted(job_id) => {
                tracing::info!(job_id = %job_id, "Translation job accepted");
                state.job = Some(Job::accepted(job_id.clone()));
                self.events.publish_job_accepted(job_id);
                self.set_status(state, messages::QUEUED);
                self.start_polling_locked(state, job_id.clone());
            }
            SubmissionOutcome::CompletedImmediately(download) => {
                tracing::info!(
                    handle = %download.handle,
                    size = download.size,
                    "Translation completed synchronously"
                );
                state.in_flight = false;
                self.release_download(state);
                self.events.publish_download_ready(download);
                state.download = Some(download.clone());
                self.set_status(state, messages::DOWNLOAD_READY);
            }
            SubmissionOutcome::CompletedWithMessage(message) => {
                state.in_flight = false;
                self.set_status(state, message.clone());
            }
            SubmissionOutcome::InFlight | SubmissionOutcome::Superseded => {}
        }
    }
}
