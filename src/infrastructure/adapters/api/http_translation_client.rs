//! HTTP Translation Client - 调用远程字幕翻译服务
//!
//! 实现 TranslationApiPort trait，通过 HTTP 调用翻译服务
//!
//! 外部 API:
//! GET  {base}/api/reference/countries
//! POST {base}/api/translation-jobs        (multipart: file, targetLanguage)
//! GET  {base}/api/translation-jobs/{jobId}
//! GET  {base}/api/health

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{parse_reply, CountryDto, CreateJobDto, JobStatusDto};
use crate::application::ports::{
    ApiError, ApiReply, CreateJobData, CreateJobRequest, JobStatusData, TranslationApiPort,
};
use crate::domain::job::JobId;
use crate::domain::reference::ReferenceOption;

/// 上传字幕文件的内容类型
pub const SUBRIP_MIME: &str = "application/x-subrip";

/// 规范化服务端地址
///
/// 去掉末尾的 `/`；宿主页面走安全传输时把 `http://` 升级为 `https://`，反之不降级
pub fn resolve_base_url(configured: &str, page_secure: bool) -> String {
    let trimmed = configured.trim().trim_end_matches('/');
    if page_secure {
        let scheme = trimmed.get(..7).unwrap_or_default();
        if scheme.eq_ignore_ascii_case("http://") {
            return format!("https://{}", &trimmed[7..]);
        }
    }
    trimmed.to_string()
}

/// HTTP 翻译客户端配置
#[derive(Debug, Clone)]
pub struct HttpTranslationClientConfig {
    /// 翻译服务基础 URL
    pub base_url: String,
    /// 宿主是否运行在安全传输之上
    pub page_secure: bool,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTranslationClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            page_secure: false,
            timeout_secs: 30,
        }
    }
}

impl HttpTranslationClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_page_secure(mut self, secure: bool) -> Self {
        self.page_secure = secure;
        self
    }
}

/// HTTP 翻译客户端
pub struct HttpTranslationClient {
    client: Client,
    base_url: String,
}

impl HttpTranslationClient {
    /// 创建新的 HTTP 翻译客户端
    pub fn new(config: HttpTranslationClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        let base_url = resolve_base_url(&config.base_url, config.page_secure);
        tracing::debug!(base_url = %base_url, "HttpTranslationClient initialized");

        Ok(Self { client, base_url })
    }

    /// 实际使用的 Base URL（已规范化）
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn countries_url(&self) -> String {
        format!("{}/api/reference/countries", self.base_url)
    }

    fn jobs_url(&self) -> String {
        format!("{}/api/translation-jobs", self.base_url)
    }

    fn job_url(&self, job_id: &JobId) -> String {
        format!(
            "{}/api/translation-jobs/{}",
            self.base_url,
            urlencoding::encode(job_id.as_str())
        )
    }

    fn health_url(&self) -> String {
        format!("{}/api/health", self.base_url)
    }

    fn map_send_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::NetworkError(format!("Cannot connect to translation service: {}", e))
        } else {
            ApiError::NetworkError(e.to_string())
        }
    }

    async fn read_reply<T: DeserializeOwned>(response: Response) -> Result<ApiReply<T>, ApiError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read body: {}", e)))?;
        Ok(parse_reply(status, &body))
    }
}

#[async_trait]
impl TranslationApiPort for HttpTranslationClient {
    async fn list_countries(&self) -> Result<ApiReply<Vec<ReferenceOption>>, ApiError> {
        tracing::debug!(url = %self.countries_url(), "Loading reference countries");

        let response = self
            .client
            .get(self.countries_url())
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let reply = Self::read_reply::<Vec<CountryDto>>(response).await?;
        Ok(reply.map(|countries| countries.into_iter().map(ReferenceOption::from).collect()))
    }

    async fn create_job(
        &self,
        request: CreateJobRequest,
    ) -> Result<ApiReply<CreateJobData>, ApiError> {
        let file_name = request.file.name().to_string();
        let file_part = Part::bytes(request.file.bytes().to_vec())
            .file_name(file_name.clone())
            .mime_str(SUBRIP_MIME)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        let mut form = Form::new().part("file", file_part);
        if let Some(target_language) = request.target_language {
            form = form.text("targetLanguage", target_language);
        }

        tracing::debug!(
            url = %self.jobs_url(),
            file = %file_name,
            size = request.file.len(),
            "Sending translation job"
        );

        let response = self
            .client
            .post(self.jobs_url())
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let reply = Self::read_reply::<CreateJobDto>(response).await?;
        tracing::debug!(status = reply.status, "Translation job response received");
        Ok(reply.map(CreateJobData::from))
    }

    async fn get_job(&self, job_id: &JobId) -> Result<ApiReply<JobStatusData>, ApiError> {
        let response = self
            .client
            .get(self.job_url(job_id))
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let reply = Self::read_reply::<JobStatusDto>(response).await?;
        tracing::debug!(
            job_id = %job_id,
            status = reply.status,
            job_status = ?reply.data.as_ref().and_then(|d| d.status.as_deref()),
            "Job status received"
        );
        Ok(reply.map(JobStatusData::from))
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::SubtitleFile;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpTranslationClient {
        HttpTranslationClient::new(HttpTranslationClientConfig::new(server.uri())).unwrap()
    }

    fn srt_request() -> CreateJobRequest {
        CreateJobRequest {
            file: SubtitleFile::new(
                "movie.srt",
                b"1\n00:00:01,000 --> 00:00:02,000\nHello\n".to_vec(),
            ),
            target_language: Some("Germany".to_string()),
        }
    }

    #[test]
    fn test_config_default() {
        let config = HttpTranslationClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.page_secure);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpTranslationClientConfig::new("http://example.com:9000")
            .with_timeout(60)
            .with_page_secure(true);
        assert_eq!(config.base_url, "http://example.com:9000");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.page_secure);
    }

    #[test]
    fn test_resolve_base_url_upgrades_only_when_secure() {
        assert_eq!(
            resolve_base_url("http://api.example.com/", true),
            "https://api.example.com"
        );
        assert_eq!(
            resolve_base_url("HTTP://api.example.com", true),
            "https://api.example.com"
        );
        assert_eq!(
            resolve_base_url("http://api.example.com/", false),
            "http://api.example.com"
        );
        // 从不降级
        assert_eq!(
            resolve_base_url("https://api.example.com", false),
            "https://api.example.com"
        );
        assert_eq!(resolve_base_url("", true), "");
    }

    #[test]
    fn test_job_id_is_path_encoded() {
        let client = HttpTranslationClient::new(HttpTranslationClientConfig::new("http://h")).unwrap();
        let job_id = JobId::new("a/b c").unwrap();
        assert_eq!(client.job_url(&job_id), "http://h/api/translation-jobs/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_list_countries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reference/countries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Countries loaded.",
                "data": [
                    {"code": "DE", "name": "Germany"},
                    {"code": "FR", "name": "France"}
                ]
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server).list_countries().await.unwrap();
        assert!(reply.is_success());
        let options = reply.data.unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0], ReferenceOption::new("DE", "Germany"));
        assert_eq!(options[1].name, "France");
    }

    #[tokio::test]
    async fn test_create_job_sends_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/translation-jobs"))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
                "message": "Translation job started.",
                "data": {"jobId": "42"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).create_job(srt_request()).await.unwrap();
        assert!(reply.is_accepted());
        assert_eq!(reply.data.unwrap().job_id.as_deref(), Some("42"));

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));

        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"file\"; filename=\"movie.srt\""));
        assert!(body.contains("application/x-subrip"));
        assert!(body.contains("name=\"targetLanguage\""));
        assert!(body.contains("Germany"));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/translation-jobs"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Only .srt files are supported."
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server).create_job(srt_request()).await.unwrap();
        assert_eq!(reply.status, 400);
        assert_eq!(reply.message(), Some("Only .srt files are supported."));
        assert!(reply.data.is_none());
    }

    #[tokio::test]
    async fn test_get_job_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/translation-jobs/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Job status retrieved.",
                "data": {"jobId": "42", "status": "FAILED", "errorMessage": "quota exceeded"}
            })))
            .mount(&server)
            .await;

        let job_id = JobId::new("42").unwrap();
        let data = client_for(&server).get_job(&job_id).await.unwrap().data.unwrap();
        assert_eq!(data.status.as_deref(), Some("FAILED"));
        assert_eq!(data.error_message.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // 端口 9 (discard) 上通常没有 HTTP 服务
        let client =
            HttpTranslationClient::new(HttpTranslationClientConfig::new("http://127.0.0.1:9").with_timeout(5))
                .unwrap();
        let job_id = JobId::new("42").unwrap();
        let result = client.get_job(&job_id).await;
        assert!(matches!(
            result,
            Err(ApiError::NetworkError(_)) | Err(ApiError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "OK",
                "data": "Backend is healthy."
            })))
            .mount(&server)
            .await;

        assert!(client_for(&server).health_check().await);

        let down = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&down)
            .await;
        assert!(!client_for(&down).health_check().await);
    }
}
