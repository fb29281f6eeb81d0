//! Backend client configuration.
//!
//! One base URL for the whole admin API. Defaults point at the local
//! development backend. Override via environment variables or explicit
//! construction.

use url::Url;
use zeroize::Zeroizing;

/// Default base URL: the local `vox-stub` backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8090";

/// Configuration for connecting to the admin backend.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended as `{base_url}api/...`.
    pub base_url: Url,
    /// Bearer token for API authentication. Wiped from memory on drop.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry attempts after the initial request on transport errors.
    pub max_retries: u32,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `VOX_API_URL` (default: `http://127.0.0.1:8090`)
    /// - `VOX_API_TOKEN` (required)
    /// - `VOX_TIMEOUT_SECS` (default: 30)
    /// - `VOX_MAX_RETRIES` (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("VOX_API_TOKEN").map_err(|_| ConfigError::MissingToken)?;
        Self::new(
            &std::env::var("VOX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            &api_token,
        )
        .map(|cfg| Self {
            timeout_secs: env_number("VOX_TIMEOUT_SECS", 30),
            max_retries: env_number("VOX_MAX_RETRIES", 3),
            ..cfg
        })
    }

    /// Explicit configuration with default timeout and retry budget.
    pub fn new(base_url: &str, token: &str) -> Result<Self, ConfigError> {
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            api_token: Zeroizing::new(token.to_string()),
            timeout_secs: 30,
            max_retries: 3,
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// Uses a short timeout and no retries so failing tests fail fast.
    pub fn local_mock(port: u16, token: &str) -> Result<Self, ConfigError> {
        let cfg = Self::new(&format!("http://127.0.0.1:{port}"), token)?;
        Ok(Self {
            timeout_secs: 5,
            max_retries: 0,
            ..cfg
        })
    }
}

/// Parse a base URL, forcing a trailing slash so paths can be appended.
fn parse_base_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn env_number<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("VOX_API_TOKEN environment variable is required")]
    MissingToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
