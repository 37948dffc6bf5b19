//! Configuration management
//!
//! 設定は環境変数から読み込まれます:
//! - `MORGEN_API_KEY` (必須)
//! - `MORGEN_BASE_URL` (省略時は公式エンドポイント)
//! - `MORGEN_HTTP_TIMEOUT_SECS` (省略時は 30 秒)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Main configuration for the Morgen MCP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Morgen API key
    pub api_key: String,

    /// Base URL of the Morgen v3 API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("MORGEN_API_KEY").map_err(|_| {
            Error::Config(
                "MORGEN_API_KEY not set. Get an API key from the Morgen developer settings."
                    .to_string(),
            )
        })?;

        let base_url = std::env::var("MORGEN_BASE_URL").unwrap_or_else(|_| default_base_url());

        let http_timeout_secs = std::env::var("MORGEN_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_secs);

        Ok(Self {
            api_key,
            base_url,
            http_timeout_secs,
        })
    }

    /// Create a configuration with explicit values (tests, embedding)
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http_timeout_secs: default_timeout_secs(),
        }
    }

    /// HTTP timeout as a [`Duration`]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://api.morgen.so/v3".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_timeout() {
        let config = Config::new("key", "https://example.test/v3");
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.base_url, "https://example.test/v3");
    }

    #[test]
    fn test_from_env_requires_api_key() {
        // Skipped when the variable happens to be set in the environment.
        if std::env::var("MORGEN_API_KEY").is_err() {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, Error::Config(msg) if msg.contains("MORGEN_API_KEY")));
        }
    }
}
