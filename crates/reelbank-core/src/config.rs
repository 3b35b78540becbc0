//! Configuration module
//!
//! Explicit client configuration, constructed once and passed to the API
//! client. There is no process-wide singleton: binaries build a
//! [`ClientConfig`] from the environment at startup and hand it to
//! `ApiClient::new`.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the remote media platform.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Platform API address, without a trailing slash.
    pub base_url: String,
    /// API token sent as `X-API-Token` on every request.
    pub api_token: String,
    /// Workspace that owns the projects this client creates.
    pub workspace_id: i64,
    /// Per-request deadline; expiry surfaces as `Error::Timeout`.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>, workspace_id: i64) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            workspace_id,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from environment: REELBANK_API_URL (default localhost:3000),
    /// REELBANK_API_TOKEN (required), REELBANK_WORKSPACE_ID (required),
    /// REELBANK_TIMEOUT_SECS (optional).
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("REELBANK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let api_token = env::var("REELBANK_API_TOKEN").map_err(|_| {
            Error::InvalidInput("Missing API token. Set REELBANK_API_TOKEN".to_string())
        })?;

        let workspace_id = env::var("REELBANK_WORKSPACE_ID").map_err(|_| {
            Error::InvalidInput("Missing workspace id. Set REELBANK_WORKSPACE_ID".to_string())
        })?;
        let workspace_id = parse_workspace_id(&workspace_id)?;

        let mut config = Self::new(base_url, api_token, workspace_id);
        if let Ok(secs) = env::var("REELBANK_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::InvalidInput(format!("Invalid REELBANK_TIMEOUT_SECS: {}", secs))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn parse_workspace_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("Invalid workspace id: {}", raw)))
}
