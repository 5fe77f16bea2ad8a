//! The retry orchestrator: prompt build -> completion -> extraction, with
//! bounded retries.
//!
//! Every failure inside an attempt counts the same, whether it came from the
//! network or from a malformed completion. Retries are immediate: failures
//! here are dominated by transient formatting issues rather than rate
//! limiting, so backoff would only add latency.

use thiserror::Error;

use crate::extract::{self, ExtractError};
use crate::llm::{CompletionClient, GenerationOptions, LlmError};
use crate::prompt;

/// Attempts before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

/// Fixed generation parameters for subtask decomposition. Low temperature
/// favors conformant list formatting over creative variation.
const OPTIONS: GenerationOptions = GenerationOptions {
    max_tokens: 500,
    temperature: 0.1,
};

/// Failure modes of the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Hugging Face credentials are not configured")]
    NotConfigured,

    #[error(transparent)]
    Upstream(#[from] LlmError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("Error after {attempts} attempts. Last error: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

/// A successfully generated item list.
#[derive(Debug)]
pub struct GeneratedItems {
    pub items: Vec<String>,
    /// Attempt number that produced the result (1-based).
    pub attempts: u32,
}

/// Ask the model to decompose `task_title` into subtasks, retrying the whole
/// completion + extraction pipeline up to [`MAX_ATTEMPTS`] times.
///
/// Returns on the first successful attempt. When every attempt fails, only
/// the most recent error is surfaced; the caller needs a final diagnostic,
/// not a failure history.
pub async fn generate_items(
    client: &dyn CompletionClient,
    task_title: &str,
) -> Result<GeneratedItems, GenerateError> {
    let messages = prompt::build_messages(task_title);
    let mut last_error = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        match run_attempt(client, &messages).await {
            Ok(items) => {
                if attempt > 1 {
                    tracing::info!("Generation succeeded on attempt {}", attempt);
                }
                return Ok(GeneratedItems { items, attempts: attempt });
            }
            Err(error) => {
                tracing::warn!("Generation attempt {}/{} failed: {}", attempt, MAX_ATTEMPTS, error);
                last_error = error.to_string();
            }
        }
    }

    Err(GenerateError::RetriesExhausted {
        attempts: MAX_ATTEMPTS,
        last_error,
    })
}

/// One attempt: a single completion call followed by extraction.
async fn run_attempt(
    client: &dyn CompletionClient,
    messages: &[crate::llm::ChatMessage],
) -> Result<Vec<String>, GenerateError> {
    let raw = client.complete(messages, OPTIONS).await?;
    let items = extract::extract_items(&raw)?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, LlmError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Stub client that fails a set number of times before succeeding.
    struct FlakyClient {
        calls: AtomicU32,
        failures_before_success: u32,
        response: &'static str,
    }

    impl FlakyClient {
        fn new(failures_before_success: u32, response: &'static str) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures_before_success,
                response,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for FlakyClient {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: GenerationOptions,
        ) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                Err(LlmError::server_error(503, "upstream unavailable".to_string()))
            } else {
                Ok(self.response.to_string())
            }
        }
    }

    #[tokio::test]
    async fn succeeds_on_first_attempt() {
        let client = FlakyClient::new(0, "['Paso uno', 'Paso dos']");
        let result = generate_items(&client, "Aprender inglés").await.unwrap();
        assert_eq!(result.items, vec!["Paso uno", "Paso dos"]);
        assert_eq!(result.attempts, 1);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let client = FlakyClient::new(2, "['Paso uno']");
        let result = generate_items(&client, "Aprender inglés").await.unwrap();
        assert_eq!(result.items, vec!["Paso uno"]);
        assert_eq!(result.attempts, 3);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn stops_after_max_attempts_and_keeps_last_error() {
        let client = FlakyClient::new(u32::MAX, "");
        let err = generate_items(&client, "Aprender inglés").await.unwrap_err();
        assert_eq!(client.calls(), MAX_ATTEMPTS);
        match err {
            GenerateError::RetriesExhausted { attempts, last_error } => {
                assert_eq!(attempts, MAX_ATTEMPTS);
                assert!(last_error.contains("upstream unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_output_is_retried_like_a_network_failure() {
        // Upstream answers, but never with a parseable list
        let client = FlakyClient::new(0, "Lo siento, no puedo ayudarte con eso.");
        let err = generate_items(&client, "Aprender inglés").await.unwrap_err();
        assert_eq!(client.calls(), MAX_ATTEMPTS);
        match err {
            GenerateError::RetriesExhausted { last_error, .. } => {
                assert!(last_error.contains("No bracketed list found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
