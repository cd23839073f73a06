//! Reference Data Supplier
//!
//! 启动时加载一次目标语言列表；失败不自动重试

use super::{messages, TranslationController};
use crate::application::error::ControllerError;
use crate::domain::reference::{ReferenceDataState, ReferenceOption};

impl TranslationController {
    /// 加载目标语言选项，返回最终状态（Ready 或 Error）
    pub async fn load_reference_data(&self) -> ReferenceDataState {
        self.state().reference = ReferenceDataState::Loading;

        let result = if self.settings.api_configured {
            self.fetch_reference_options().await
        } else {
            Err(messages::BASE_URL_MISSING.to_string())
        };

        let mut state = self.state();
        match result {
            Ok(options) => {
                tracing::info!(count = options.len(), "Reference data loaded");
                if state.target_language.is_none() {
                    state.target_language = options.first().map(|o| o.code.clone());
                }
                self.events.publish_reference_loaded(options.len());
                state.reference = ReferenceDataState::Ready(options);
            }
            Err(message) => {
                tracing::warn!(error = %message, "Failed to load reference data");
                self.events.publish_reference_failed(&message);
                state.reference = ReferenceDataState::Error(message);
            }
        }
        state.reference.clone()
    }

    async fn fetch_reference_options(&self) -> Result<Vec<ReferenceOption>, String> {
        let reply = self
            .api
            .list_countries()
            .await
            .map_err(|e| ControllerError::from(e).user_message())?;

        if !reply.is_success() {
            return Err(reply
                .message()
                .unwrap_or(messages::REFERENCE_LOAD_FAILED)
                .to_string());
        }
        Ok(reply.data.unwrap_or_default())
    }

    /// 选择目标语言（必须是已加载的代码）
    pub fn select_target_language(&self, code: &str) -> Result<(), ControllerError> {
        let mut state = self.state();
        if state.reference.find(code).is_none() {
            return Err(ControllerError::validation(messages::unknown_target_language(code)));
        }
        tracing::debug!(code = %code, "Target language selected");
        state.target_language = Some(code.to_string());
        Ok(())
    }
}
