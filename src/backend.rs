//! HTTP client for the document question-answering backend.
//!
//! The backend exposes two operations the client cares about: multipart
//! document ingestion and chat. Responses are decoded into typed values
//! at this boundary; anything that does not match the expected shape is
//! reported as an error rather than passed through loosely.

use crate::error::{Error, Result};
use crate::models::{HistoryEntry, UploadCandidate};
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Ingest result status for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Per-file result of an ingest call. The backend returns one of these
/// per submitted file, in arbitrary order; results correlate by filename.
///
/// Locally rejected files are represented with the same type so the
/// summary step can treat backend results and local rejections uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub filename: String,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl UploadOutcome {
    /// Build a local rejection outcome that never reached the backend.
    pub fn rejected(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: OutcomeStatus::Error,
            error_message: Some(reason.into()),
        }
    }
}

/// Answer to a chat request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: &'a [HistoryEntry],
}

/// Structured error body the backend may attach to a failed request.
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid backend URL: {}", e)))
    }

    /// Submit one query with its conversational context.
    ///
    /// A backend-evaluated failure carrying a `detail` string surfaces as
    /// [`Error::Backend`]; everything else (connection failure, timeout,
    /// undecodable body, non-2xx without `detail`) is transport-level.
    pub async fn chat(&self, message: &str, history: &[HistoryEntry]) -> Result<ChatAnswer> {
        let url = self.endpoint("/api/v1/chat")?;
        let request = ChatRequest { message, history };
        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            if let Ok(body) = response.json::<ErrorBody>().await {
                if let Some(detail) = body.detail {
                    return Err(Error::Backend(detail));
                }
            }
            return Err(Error::UnexpectedResponse(format!(
                "chat request failed with status {}",
                status
            )));
        }

        Ok(response.json::<ChatAnswer>().await?)
    }

    /// Submit a batch of files as one multipart request, one part per file
    /// under the repeated `files` field.
    ///
    /// Returns one outcome per submitted file. A response that does not
    /// decode as an outcome list is an error; the caller treats it the
    /// same as any other transport failure.
    pub async fn ingest(&self, files: Vec<UploadCandidate>) -> Result<Vec<UploadOutcome>> {
        let url = self.endpoint("/api/v1/ingest")?;

        let mut form = multipart::Form::new();
        for file in files {
            let mime = mime_guess::from_path(&file.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string();
            let part = multipart::Part::bytes(file.data)
                .file_name(file.name)
                .mime_str(&mime)?;
            form = form.part("files", part);
        }

        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedResponse(format!(
                "ingest request failed with status {}",
                status
            )));
        }

        Ok(response.json::<Vec<UploadOutcome>>().await?)
    }

    /// Probe the backend health endpoint. `Ok(false)` means the backend
    /// answered but reported itself unhealthy; `Err` means it was not
    /// reachable at all.
    pub async fn health(&self) -> Result<bool> {
        let url = self.endpoint("/api/v1/health")?;
        let response = self.client.get(url).send().await?;
        Ok(response.status().is_success())
    }
}
