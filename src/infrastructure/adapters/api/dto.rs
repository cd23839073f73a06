//! Data Transfer Objects - 翻译服务线上格式
//!
//! 所有响应都包在统一信封 `{ message, data }` 中，字段为 camelCase

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application::ports::{ApiReply, CreateJobData, JobStatusData};
use crate::domain::reference::ReferenceOption;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应信封
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub message: Option<String>,
    pub data: Option<T>,
}

/// 解析响应体；非 JSON 或结构不符时视为没有负载
pub fn parse_reply<T: DeserializeOwned>(status: u16, body: &[u8]) -> ApiReply<T> {
    match serde_json::from_slice::<Envelope<T>>(body) {
        Ok(envelope) => ApiReply::new(status, envelope.message, envelope.data),
        Err(e) => {
            // 数据结构不符时至少保留 message
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(body)
                .ok()
                .and_then(|envelope| envelope.message);
            tracing::debug!(status, error = %e, "Response body did not match expected shape");
            ApiReply::new(status, message, None)
        }
    }
}

// ============================================================================
// Reference DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CountryDto {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl From<CountryDto> for ReferenceOption {
    fn from(dto: CountryDto) -> Self {
        ReferenceOption::new(dto.code, dto.name)
    }
}

// ============================================================================
// Translation Job DTOs
// ============================================================================

/// POST /api/translation-jobs 的 data（202 或旧版同步 200）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobDto {
    pub job_id: Option<String>,
    pub content_base64: Option<String>,
    pub output_file_name: Option<String>,
}

impl From<CreateJobDto> for CreateJobData {
    fn from(dto: CreateJobDto) -> Self {
        Self {
            job_id: dto.job_id,
            content_base64: dto.content_base64,
            output_file_name: dto.output_file_name,
        }
    }
}

/// GET /api/translation-jobs/{jobId} 的 data
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusDto {
    pub job_id: Option<String>,
    pub status: Option<String>,
    pub input_file_name: Option<String>,
    pub output_file_name: Option<String>,
    pub content_base64: Option<String>,
    pub error_message: Option<String>,
}

impl From<JobStatusDto> for JobStatusData {
    fn from(dto: JobStatusDto) -> Self {
        Self {
            job_id: dto.job_id,
            status: dto.status,
            input_file_name: dto.input_file_name,
            output_file_name: dto.output_file_name,
            content_base64: dto.content_base64,
            error_message: dto.error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_reply() {
        let body = br#"{"message":"Translation job started.","data":{"jobId":"42","message":"Use GET ..."}}"#;
        let reply = parse_reply::<CreateJobDto>(202, body);
        assert_eq!(reply.status, 202);
        assert_eq!(reply.message(), Some("Translation job started."));
        assert_eq!(reply.data.unwrap().job_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_parse_job_status() {
        let body = br#"{"data":{"jobId":"42","status":"COMPLETED","inputFileName":"movie.srt","outputFileName":"movie_german.srt","contentBase64":"SGVsbG8=","errorMessage":null}}"#;
        let data: JobStatusData = parse_reply::<JobStatusDto>(200, body).data.unwrap().into();
        assert_eq!(data.status.as_deref(), Some("COMPLETED"));
        assert_eq!(data.output_file_name.as_deref(), Some("movie_german.srt"));
        assert_eq!(data.content_base64.as_deref(), Some("SGVsbG8="));
        assert!(data.error_message.is_none());
    }

    #[test]
    fn test_non_json_body_has_no_payload() {
        let reply = parse_reply::<JobStatusDto>(502, b"<html>Bad Gateway</html>");
        assert_eq!(reply.status, 502);
        assert!(reply.message.is_none());
        assert!(reply.data.is_none());
    }

    #[test]
    fn test_mismatched_data_keeps_message() {
        let body = br#"{"message":"OK","data":"Backend is healthy."}"#;
        let reply = parse_reply::<Vec<CountryDto>>(200, body);
        assert_eq!(reply.message(), Some("OK"));
        assert!(reply.data.is_none());
    }
}
