//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to decompose a task into subtasks.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateItemsRequest {
    /// The task description to decompose
    pub title: String,
}

/// One generated subtask.
///
/// The prompt asks for texts of at most 128 characters; the bound is a
/// convention, not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubtaskItem {
    pub content: String,
}

/// Envelope status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// The sole externally visible result shape.
///
/// Exactly one of the two forms holds: `status=success` with `data` present,
/// or `status=error` with `data` absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<SubtaskItem>>,
}

impl ResponseEnvelope {
    /// Build a success envelope wrapping generated items.
    pub fn success(message: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(
                items
                    .into_iter()
                    .map(|content| SubtaskItem { content })
                    .collect(),
            ),
        }
    }

    /// Build an error envelope with a diagnostic message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether HF_MODEL and HF_TOKEN are both present (values never echoed)
    pub model_configured: bool,
}
