//! Job Context - Aggregate Root

use chrono::{DateTime, Utc};

use super::{JobId, JobStatus};

/// Job 聚合根
///
/// 不变量:
/// - 进入终态后状态不再变化
/// - output_file_name 仅在 COMPLETED 时设置，error_message 仅在 FAILED 时设置
#[derive(Debug, Clone)]
pub struct Job {
    id: JobId,
    status: JobStatus,
    output_file_name: Option<String>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    /// 异步受理后创建，首次轮询前假定为 PENDING
    pub fn accepted(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Pending,
            output_file_name: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 非终态迁移，返回状态是否发生变化
    pub fn transition(&mut self, status: JobStatus) -> bool {
        if self.status.is_terminal() || self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = Utc::now();
        true
    }

    pub fn complete(&mut self, output_file_name: Option<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Completed;
        self.output_file_name = output_file_name;
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self, error_message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(error_message.into());
        self.updated_at = Utc::now();
    }

    // Getters
    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    pub fn output_file_name(&self) -> Option<&str> {
        self.output_file_name.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::accepted(JobId::new("42").unwrap())
    }

    #[test]
    fn test_accepted_job_starts_pending() {
        let job = job();
        assert_eq!(job.status(), &JobStatus::Pending);
        assert!(job.output_file_name().is_none());
    }

    #[test]
    fn test_transition_reports_change() {
        let mut job = job();
        assert!(!job.transition(JobStatus::Pending));
        assert!(job.transition(JobStatus::Processing));
        assert_eq!(job.status(), &JobStatus::Processing);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut job = job();
        job.fail("quota exceeded");
        assert_eq!(job.status(), &JobStatus::Failed);

        assert!(!job.transition(JobStatus::Processing));
        job.complete(Some("out.srt".to_string()));
        assert_eq!(job.status(), &JobStatus::Failed);
        assert_eq!(job.error_message(), Some("quota exceeded"));
        assert!(job.output_file_name().is_none());
    }
}
