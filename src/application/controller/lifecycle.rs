//! Lifecycle / Resource Manager
//!
//! 文件切换、新提交、关闭三个入口共用同一个幂等的 `release_prior_state`

use std::path::{Path, PathBuf};

use super::{messages, ControllerState, TranslationController};
use crate::application::error::ControllerError;
use crate::domain::job::SubtitleFile;

impl TranslationController {
    /// 用户选择了新文件（None 表示清空选择）
    pub fn select_file(&self, file: Option<SubtitleFile>) {
        let mut state = self.state();
        self.release_for_new_file(&mut state);
        tracing::debug!(
            file = ?file.as_ref().map(|f| f.name()),
            size = file.as_ref().map(|f| f.len()),
            "Subtitle file selected"
        );
        state.selected_file = file;
    }

    /// 停止轮询、丢弃 Job、释放下载资源、清空状态消息
    pub fn reset_for_new_file(&self) {
        let mut state = self.state();
        self.release_for_new_file(&mut state);
    }

    /// 新提交发出前调用
    ///
    /// 外部调用时同样放弃进行中的提交与轮询，之后可以立即再次提交
    pub fn reset_for_new_submission(&self) {
        let mut state = self.state();
        self.release_prior_state(&mut state);
        state.in_flight = false;
    }

    /// 最终关闭：保证之后不再有定时器触发
    ///
    /// 不回收当前下载资源，它可能已经交给了下载动作
    pub fn teardown(&self) {
        let mut state = self.state();
        if state.shut_down {
            return;
        }
        self.stop_polling_locked(&mut state);
        state.generation += 1;
        state.in_flight = false;
        state.shut_down = true;
        tracing::info!("Translation controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.state().shut_down
    }

    fn release_for_new_file(&self, state: &mut ControllerState) {
        self.release_prior_state(state);
        // 被取代的提交不再占用 in-flight 标记
        state.in_flight = false;
    }

    pub(super) fn release_prior_state(&self, state: &mut ControllerState) {
        self.stop_polling_locked(state);
        state.generation += 1;
        if let Some(job) = state.job.take() {
            tracing::debug!(job_id = %job.id(), status = %job.status(), "Discarding job");
        }
        self.release_download(state);
        self.set_status(state, "");
    }

    pub(super) fn release_download(&self, state: &mut ControllerState) {
        let Some(download) = state.download.take() else {
            return;
        };
        match self.decoder.store().release(&download.handle) {
            Ok(released) => {
                tracing::debug!(handle = %download.handle, released, "Download released");
            }
            Err(e) => {
                tracing::warn!(handle = %download.handle, error = %e, "Failed to release download");
            }
        }
        self.events.publish_download_released(&download.handle);
    }

    /// 读取当前下载结果的字节
    pub async fn read_download(&self) -> Result<Vec<u8>, ControllerError> {
        let download = self
            .download()
            .ok_or_else(|| ControllerError::validation(messages::NO_DOWNLOAD))?;
        Ok(self.decoder.store().read(&download.handle).await?)
    }

    /// 一次性下载动作：把结果写到 `dir/<输出文件名>`，dir 缺省为配置的下载目录
    pub async fn save_download(&self, dir: Option<&Path>) -> Result<PathBuf, ControllerError> {
        let download = self
            .download()
            .ok_or_else(|| ControllerError::validation(messages::NO_DOWNLOAD))?;
        let bytes = self.decoder.store().read(&download.handle).await?;

        let dir = dir.unwrap_or(&self.settings.download_dir);
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ControllerError::StorageError(e.to_string()))?;

        // 服务端给的文件名只取最后一段，避免写出目标目录
        let file_name = Path::new(&download.file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| self.settings.default_output_name.clone().into());
        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ControllerError::StorageError(e.to_string()))?;

        tracing::info!(path = %path.display(), size = bytes.len(), "Translated file saved");
        Ok(path)
    }
}
