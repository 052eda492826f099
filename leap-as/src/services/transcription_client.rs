//! AssemblyAI transcription client
//!
//! Drives the provider's asynchronous job to a terminal state:
//! upload audio, start a transcript job, then poll on a fixed interval
//! until `completed` or `error`. The poll loop is bounded by an attempt
//! budget; exhaustion surfaces as a distinct `Timeout` error so callers can
//! report 504 rather than hanging a request forever.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";
const USER_AGENT: &str = "LEAP/0.1.0 (leap-as)";
const POLL_INTERVAL_MS: u64 = 3000; // fixed 3-second poll interval
const MAX_POLL_ATTEMPTS: u32 = 100; // ~5 minutes at 3s per attempt

/// Transcription client errors
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Transcription job failed: {0}")]
    JobFailed(String),

    #[error("Transcription job did not complete within {attempts} poll attempts")]
    Timeout { attempts: u32 },

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct StartJobRequest<'a> {
    audio_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct StartJobResponse {
    id: String,
}

/// Job status as reported by the provider; unrecognized values keep polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    status: JobStatus,
    text: Option<String>,
    error: Option<String>,
}

/// AssemblyAI API client
pub struct TranscriptionClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl TranscriptionClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, TranscribeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            max_poll_attempts: MAX_POLL_ATTEMPTS,
        })
    }

    /// Override poll pacing (tests and constrained deployments)
    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts;
        self
    }

    /// Transcribe an audio sample to text
    ///
    /// Touches no persistent state; the only side effects are the outbound
    /// provider calls.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscribeError> {
        let audio_url = self.upload(audio).await?;
        let job_id = self.start_job(&audio_url).await?;
        self.poll_until_terminal(&job_id).await
    }

    /// Upload raw audio; returns the provider's opaque reference
    async fn upload(&self, audio: &[u8]) -> Result<String, TranscribeError> {
        let url = format!("{}/upload", self.base_url);
        tracing::debug!(bytes = audio.len(), "Uploading audio to transcription provider");

        let response = self
            .http_client
            .post(&url)
            .header("authorization", &self.api_key)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api(status.as_u16(), error_text));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;

        Ok(upload.upload_url)
    }

    /// Start a transcription job for an uploaded reference; returns job id
    async fn start_job(&self, audio_url: &str) -> Result<String, TranscribeError> {
        let url = format!("{}/transcript", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .header("authorization", &self.api_key)
            .json(&StartJobRequest { audio_url })
            .send()
            .await
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api(status.as_u16(), error_text));
        }

        let job: StartJobResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;

        tracing::info!(job_id = %job.id, "Transcription job started");
        Ok(job.id)
    }

    /// Poll job status on the fixed interval until a terminal state
    async fn poll_until_terminal(&self, job_id: &str) -> Result<String, TranscribeError> {
        let url = format!("{}/transcript/{}", self.base_url, job_id);

        for attempt in 1..=self.max_poll_attempts {
            let response = self
                .http_client
                .get(&url)
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(|e| TranscribeError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(TranscribeError::Api(status.as_u16(), error_text));
            }

            let job: JobStatusResponse = response
                .json()
                .await
                .map_err(|e| TranscribeError::Parse(e.to_string()))?;

            match job.status {
                JobStatus::Completed => {
                    let text = job.text.unwrap_or_default();
                    tracing::info!(
                        job_id = %job_id,
                        attempt,
                        chars = text.len(),
                        "Transcription completed"
                    );
                    return Ok(text);
                }
                JobStatus::Error => {
                    let detail = job.error.unwrap_or_else(|| "unspecified".to_string());
                    tracing::warn!(job_id = %job_id, error = %detail, "Transcription job failed");
                    return Err(TranscribeError::JobFailed(detail));
                }
                JobStatus::Queued | JobStatus::Processing | JobStatus::Other => {
                    tracing::debug!(job_id = %job_id, attempt, status = ?job.status, "Polling");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(TranscribeError::Timeout {
            attempts: self.max_poll_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TranscriptionClient::new("test-key".to_string(), None);
        assert!(client.is_ok());
    }

    #[test]
    fn base_url_override_applies() {
        let client =
            TranscriptionClient::new("k".to_string(), Some("http://localhost:9999".to_string()))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn status_parses_known_and_unknown_values() {
        let parsed: JobStatusResponse =
            serde_json::from_str(r#"{"status":"completed","text":"hello"}"#).unwrap();
        assert_eq!(parsed.status, JobStatus::Completed);
        assert_eq!(parsed.text.as_deref(), Some("hello"));

        let parsed: JobStatusResponse =
            serde_json::from_str(r#"{"status":"throttled"}"#).unwrap();
        assert_eq!(parsed.status, JobStatus::Other);
    }

    #[test]
    fn error_status_carries_detail() {
        let parsed: JobStatusResponse =
            serde_json::from_str(r#"{"status":"error","error":"bad audio"}"#).unwrap();
        assert_eq!(parsed.status, JobStatus::Error);
        assert_eq!(parsed.error.as_deref(), Some("bad audio"));
    }
}
