//! Generative Language API client
//!
//! Single-shot text generation against the provider's
//! `POST /models/{model}:generateText` endpoint. Deterministic settings
//! (temperature 0) because the caller needs to parse the response as JSON.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta2";
const DEFAULT_MODEL: &str = "text-bison-001";
const USER_AGENT: &str = "LEAP/0.1.0 (leap-as)";
const MAX_OUTPUT_TOKENS: u32 = 512;

/// Generation client errors
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Provider returned no candidates")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct GenerateTextRequest<'a> {
    prompt: TextPrompt<'a>,
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateTextResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    output: String,
}

/// Generative Language API client
pub struct GenerationClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GenerationClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, GenerateError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Generate text for a prompt; returns the first candidate's output
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateText?key={}",
            self.base_url, self.model, self.api_key
        );

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Invoking generative model");

        let response = self
            .http_client
            .post(&url)
            .json(&GenerateTextRequest {
                prompt: TextPrompt { text: prompt },
                temperature: 0.0,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            })
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api(status.as_u16(), error_text));
        }

        let body: GenerateTextResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Parse(e.to_string()))?;

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerateError::EmptyResponse)?;

        tracing::debug!(output_chars = candidate.output.len(), "Model responded");
        Ok(candidate.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GenerationClient::new("test-key".to_string(), None, None);
        assert!(client.is_ok());
    }

    #[test]
    fn defaults_apply_when_overrides_absent() {
        let client = GenerationClient::new("k".to_string(), None, None).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn request_body_matches_wire_contract() {
        let request = GenerateTextRequest {
            prompt: TextPrompt { text: "hello" },
            temperature: 0.0,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["prompt"]["text"], "hello");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["maxOutputTokens"], 512);
    }

    #[test]
    fn response_with_no_candidates_deserializes_empty() {
        let body: GenerateTextResponse = serde_json::from_str("{}").unwrap();
        assert!(body.candidates.is_empty());
    }
}
