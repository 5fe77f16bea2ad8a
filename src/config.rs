//! Configuration management for itemizer.
//!
//! Configuration can be set via environment variables:
//! - `HF_MODEL` - The Hugging Face model identifier. Required for generation;
//!   if unset the endpoint answers with a configuration-error envelope.
//! - `HF_TOKEN` - The Hugging Face API token. Same requirement as `HF_MODEL`.
//!   Sensitive: never logged and never echoed in responses.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `UPSTREAM_TIMEOUT_SECS` - Optional. Per-attempt timeout for upstream
//!   completion calls. Defaults to `60`.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hugging Face model identifier
    pub hf_model: Option<String>,

    /// Hugging Face API token (sensitive)
    pub hf_token: Option<String>,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Per-attempt timeout for upstream completion calls
    pub upstream_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing credentials are not an error at load time: the process starts
    /// and the endpoint reports the misconfiguration per request instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        let hf_model = std::env::var("HF_MODEL").ok().filter(|s| !s.is_empty());
        let hf_token = std::env::var("HF_TOKEN").ok().filter(|s| !s.is_empty());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let timeout_secs: u64 = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("UPSTREAM_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            hf_model,
            hf_token,
            host,
            port,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Model identifier and token, if both are configured and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.hf_model.as_deref(), self.hf_token.as_deref()) {
            (Some(model), Some(token)) => Some((model, token)),
            _ => None,
        }
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(hf_model: Option<String>, hf_token: Option<String>) -> Self {
        Self {
            hf_model,
            hf_token,
            host: "127.0.0.1".to_string(),
            port: 3000,
            upstream_timeout: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_values() {
        let config = Config::new(Some("org/model".to_string()), Some("hf_xxx".to_string()));
        assert_eq!(config.credentials(), Some(("org/model", "hf_xxx")));

        let config = Config::new(Some("org/model".to_string()), None);
        assert_eq!(config.credentials(), None);

        let config = Config::new(None, None);
        assert_eq!(config.credentials(), None);
    }
}
