//! Hugging Face router API client.
//!
//! Talks to the OpenAI-compatible chat-completion endpoint of the Hugging
//! Face inference router. One network call per invocation; the retry loop
//! lives in [`crate::generate`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{classify_http_status, LlmError, LlmErrorKind};
use super::{ChatMessage, CompletionClient, GenerationOptions};

const HF_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Hugging Face chat-completion client.
pub struct HfClient {
    client: Client,
    model: String,
    token: String,
}

impl HfClient {
    /// Create a new client for the given model and token.
    ///
    /// `timeout` bounds each request end to end; without it a stalled
    /// upstream call would block an attempt indefinitely.
    pub fn new(
        model: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            model: model.into(),
            token: token.into(),
        })
    }

    /// Create an LlmError from HTTP response status and body.
    fn create_error(status: reqwest::StatusCode, body: &str) -> LlmError {
        let status_code = status.as_u16();
        match classify_http_status(status_code) {
            LlmErrorKind::RateLimited => LlmError::rate_limited(body.to_string()),
            LlmErrorKind::ClientError => LlmError::client_error(status_code, body.to_string()),
            _ => LlmError::server_error(status_code, body.to_string()),
        }
    }
}

#[async_trait]
impl CompletionClient for HfClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: GenerationOptions,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        tracing::debug!("Sending completion request: model={}", self.model);

        let response = match self
            .client
            .post(HF_API_URL)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    return Err(LlmError::network_error(format!("Request timeout: {}", e)));
                } else if e.is_connect() {
                    return Err(LlmError::network_error(format!("Connection failed: {}", e)));
                } else {
                    return Err(LlmError::network_error(format!("Request failed: {}", e)));
                }
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Self::create_error(status, &body));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::parse_error(format!("Failed to parse response: {}, body: {}", e, body))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::parse_error("No choices in response".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| LlmError::parse_error("No content in response message".to_string()))
    }
}

/// Chat-completion request format (OpenAI-compatible).
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u64,
    temperature: f64,
}

/// Chat-completion response format.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

/// A choice in the completion response.
#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

/// Message in the completion response.
#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}
