//! Collaborator client: the single point of entry for every backend call the
//! dashboard makes.
//!
//! No other module talks HTTP. Views and the coordinator depend on the
//! [`Collaborator`] trait so tests can script responses without a network.
//!
//! Calls are issued exactly once: generation and publishing are not
//! idempotent, and the search runner's last-write-wins policy assumes one
//! request per search.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::search::{parse_job_listings, JobListing};

pub mod tone;

pub use tone::Tone;

const PROFILE_PDF_PATH: &str = "api/analyze/profile-pdf";
const LINKEDIN_PATH: &str = "api/analyze/linkedin";
const SCRAPE_URL_PATH: &str = "api/analyze/scrape-url";
const GENERATE_POST_PATH: &str = "api/generate/post";
const PUBLISH_PATH: &str = "api/publish/linkedin";
const JOBS_PATH: &str = "api/jobs/recommend";

/// Prefix the post generator uses to report failures inside a 200 response.
const IN_BAND_ERROR_PREFIX: &str = "Error:";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The collaborator's human-readable failure reason, when it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// A file picked for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct GeneratePostRequest<'a> {
    topic: &'a str,
    tone: Tone,
}

#[derive(Debug, Deserialize)]
struct GeneratedPost {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    token: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// The external services the dashboard consumes.
///
/// Analysis calls return the raw, loosely-shaped payload; normalizing it is
/// the stats module's job, not the client's.
#[async_trait]
pub trait Collaborator: Send + Sync {
    async fn analyze_profile_pdf(&self, upload: Upload) -> Result<Value, ApiError>;

    async fn analyze_linkedin(&self, upload: Upload) -> Result<Value, ApiError>;

    async fn scrape_url(&self, url: &str) -> Result<Value, ApiError>;

    async fn generate_post(&self, topic: &str, tone: Tone) -> Result<String, ApiError>;

    async fn publish(&self, token: &str, text: &str) -> Result<(), ApiError>;

    /// A missing or malformed `jobs` field yields an empty list, not an error.
    async fn recommend_jobs(&self, term: &str) -> Result<Vec<JobListing>, ApiError>;
}

/// `reqwest`-backed [`Collaborator`] talking to the dashboard backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Sends the request and returns the JSON body of a 2xx response.
    /// Non-2xx responses become [`ApiError::Api`] carrying the `detail`
    /// string of a `{"detail": "..."}` body when there is one.
    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned {}: {}", status, body);
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail.as_str().map(str::to_string));
            return Err(ApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn post_file(&self, path: &str, upload: Upload) -> Result<Value, ApiError> {
        debug!(
            "Uploading {} ({} bytes) to {}",
            upload.file_name,
            upload.bytes.len(),
            path
        );
        let part = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);
        let url = self.endpoint(path)?;
        self.send(self.client.post(url).multipart(form)).await
    }
}

#[async_trait]
impl Collaborator for BackendClient {
    async fn analyze_profile_pdf(&self, upload: Upload) -> Result<Value, ApiError> {
        self.post_file(PROFILE_PDF_PATH, upload).await
    }

    async fn analyze_linkedin(&self, upload: Upload) -> Result<Value, ApiError> {
        self.post_file(LINKEDIN_PATH, upload).await
    }

    async fn scrape_url(&self, url: &str) -> Result<Value, ApiError> {
        let endpoint = self.endpoint(SCRAPE_URL_PATH)?;
        self.send(self.client.post(endpoint).json(&ScrapeRequest { url }))
            .await
    }

    async fn generate_post(&self, topic: &str, tone: Tone) -> Result<String, ApiError> {
        let endpoint = self.endpoint(GENERATE_POST_PATH)?;
        let body = self
            .send(
                self.client
                    .post(endpoint)
                    .json(&GeneratePostRequest { topic, tone }),
            )
            .await?;
        let generated: GeneratedPost = serde_json::from_value(body)?;
        validate_generated(generated.content)
    }

    async fn publish(&self, token: &str, text: &str) -> Result<(), ApiError> {
        let endpoint = self.endpoint(PUBLISH_PATH)?;
        self.send(self.client.post(endpoint).json(&PublishRequest { token, text }))
            .await?;
        Ok(())
    }

    async fn recommend_jobs(&self, term: &str) -> Result<Vec<JobListing>, ApiError> {
        let endpoint = self.endpoint(JOBS_PATH)?;
        let body = self
            .send(self.client.get(endpoint).query(&[("skill", term)]))
            .await?;
        Ok(parse_job_listings(&body))
    }
}

/// Rejects empty content and the generator's in-band `"Error: ..."` replies.
fn validate_generated(content: Option<String>) -> Result<String, ApiError> {
    match content {
        Some(text) if text.trim_start().starts_with(IN_BAND_ERROR_PREFIX) => {
            Err(ApiError::Shape(text))
        }
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ApiError::Shape(
            "generated post has no content".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let base = Url::parse("http://localhost:8000/backend").unwrap();
        let client = BackendClient::new(base, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint(JOBS_PATH).unwrap().as_str(),
            "http://localhost:8000/backend/api/jobs/recommend"
        );
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let base = Url::parse("http://127.0.0.1:8000").unwrap();
        let client = BackendClient::new(base, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint(PUBLISH_PATH).unwrap().as_str(),
            "http://127.0.0.1:8000/api/publish/linkedin"
        );
    }

    #[test]
    fn test_validate_generated_accepts_text() {
        let text = validate_generated(Some("Rust is great".to_string())).unwrap();
        assert_eq!(text, "Rust is great");
    }

    #[test]
    fn test_validate_generated_rejects_missing_and_blank() {
        assert!(matches!(validate_generated(None), Err(ApiError::Shape(_))));
        assert!(matches!(
            validate_generated(Some("   ".to_string())),
            Err(ApiError::Shape(_))
        ));
    }

    #[test]
    fn test_validate_generated_rejects_in_band_error() {
        let err = validate_generated(Some(
            "Error: GEMINI_API_KEY not found in .env file.".to_string(),
        ))
        .unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_detail_only_for_api_errors() {
        let api = ApiError::Api {
            status: 400,
            detail: Some("LinkedIn Rejected: Duplicate Post".to_string()),
        };
        assert_eq!(api.detail(), Some("LinkedIn Rejected: Duplicate Post"));
        assert_eq!(ApiError::Shape("x".to_string()).detail(), None);
    }

    #[test]
    fn test_api_error_display_without_detail() {
        let err = ApiError::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "API error (status 500): no detail");
    }
}
