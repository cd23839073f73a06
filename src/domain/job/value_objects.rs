//! Job Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::JobError;

/// 翻译任务标识（服务端分配的不透明字符串）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// 空白 ID 视为无效，返回 None
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 任务状态
///
/// 服务端返回的未知状态保留原文，按非终态处理
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Unknown(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "PROCESSING" => Self::Processing,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Unknown(raw) => raw,
        }
    }

    /// COMPLETED 与 FAILED 为终态，之后不再发生状态迁移
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 用户选择的字幕文件
#[derive(Clone, PartialEq, Eq)]
pub struct SubtitleFile {
    name: String,
    bytes: Vec<u8>,
}

impl SubtitleFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// 从磁盘读取字幕文件
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, JobError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| JobError::Io(format!("not a file path: {}", path.display())))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| JobError::Io(e.to_string()))?;
        Ok(Self { name, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 上传前校验：扩展名（不区分大小写）、非空、大小上限
    pub fn validate(&self, allowed_extension: &str, max_bytes: u64) -> Result<(), JobError> {
        let extension = allowed_extension.trim_start_matches('.');
        let has_extension = Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case(extension));
        if !has_extension {
            return Err(JobError::UnsupportedExtension(extension.to_string()));
        }
        if self.is_empty() {
            return Err(JobError::EmptyFile);
        }
        if self.len() > max_bytes {
            return Err(JobError::FileTooLarge {
                size: self.len(),
                max: max_bytes,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for SubtitleFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtitleFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_rejects_blank() {
        assert!(JobId::new("   ").is_none());
        assert_eq!(JobId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(JobStatus::parse("PENDING"), JobStatus::Pending);
        assert_eq!(JobStatus::parse("processing"), JobStatus::Processing);
        assert_eq!(JobStatus::parse("COMPLETED"), JobStatus::Completed);
        assert_eq!(JobStatus::parse("FAILED"), JobStatus::Failed);
        assert_eq!(
            JobStatus::parse("RETRYING"),
            JobStatus::Unknown("RETRYING".to_string())
        );
    }

    #[test]
    fn test_only_completed_and_failed_are_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Unknown("ARCHIVED".into()).is_terminal());
    }

    #[test]
    fn test_subtitle_validation() {
        let file = SubtitleFile::new("Movie.SRT", b"1\n00:00:01,000 --> 00:00:02,000\nHi\n".to_vec());
        assert!(file.validate("srt", 1024).is_ok());

        let wrong = SubtitleFile::new("movie.txt", b"x".to_vec());
        assert!(matches!(
            wrong.validate("srt", 1024),
            Err(JobError::UnsupportedExtension(_))
        ));

        let empty = SubtitleFile::new("movie.srt", Vec::new());
        assert!(matches!(empty.validate("srt", 1024), Err(JobError::EmptyFile)));

        let big = SubtitleFile::new("movie.srt", vec![b'a'; 11]);
        assert!(matches!(
            big.validate(".srt", 10),
            Err(JobError::FileTooLarge { size: 11, max: 10 })
        ));
    }
}
