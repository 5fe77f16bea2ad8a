//! Completion client module for interacting with language models.
//!
//! This module provides a trait-based abstraction over chat-completion
//! providers, with the Hugging Face router API as the primary implementation.

mod error;
mod huggingface;

pub use error::{classify_http_status, LlmError, LlmErrorKind};
pub use huggingface::HfClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role in a chat conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ChatMessage {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage::new(Role::Assistant, content)
    }
}

/// Generation parameters for a completion request.
///
/// These are intentionally conservative; the goal is reproducible,
/// format-conformant output rather than creative variation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    /// Maximum output tokens to generate.
    pub max_tokens: u64,
    /// Sampling temperature (0 = deterministic).
    pub temperature: f64,
}

/// Trait for completion clients.
///
/// Implementations perform exactly one network call per invocation and never
/// retry internally; retry policy lives in [`crate::generate`] so failure
/// semantics stay centralized.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a chat completion request, returning the raw completion text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: GenerationOptions,
    ) -> Result<String, LlmError>;
}
