//! 用户可见的状态消息

pub const STARTING: &str = "Starting translation...";
pub const QUEUED: &str = "Translation queued...";
pub const IN_PROGRESS: &str = "Translation in progress...";
pub const DOWNLOAD_READY: &str = "Translation completed. Download ready.";
pub const COMPLETED: &str = "Translation completed.";
pub const COMPLETED_NO_CONTENT: &str = "Translation completed but no content was returned.";
pub const FAILED: &str = "Translation failed.";

pub const NO_FILE: &str = "Please select a subtitle file.";
pub const NO_TARGET_LANGUAGE: &str = "Please select a target language.";
pub const REFERENCE_LOADING: &str = "Target languages are still loading.";
pub const SHUT_DOWN: &str = "Controller has been shut down.";
pub const NO_DOWNLOAD: &str = "No translated file is available.";

pub const JOB_ID_MISSING: &str = "Job accepted but no identifier returned.";
pub const STATUS_MISSING: &str = "Job status response did not include a status.";

pub const BASE_URL_MISSING: &str = "API base URL is not configured.";
pub const REFERENCE_LOAD_FAILED: &str = "Failed to load countries.";

pub fn start_failed(status: u16) -> String {
    format!("Failed to start translation (HTTP {}).", status)
}

pub fn poll_failed(status: u16) -> String {
    format!("Failed to check translation status (HTTP {}).", status)
}

pub fn unknown_target_language(code: &str) -> String {
    format!("Unknown target language: {}", code)
}
