//! # vox-client -- Typed client for the Vox admin backend
//!
//! Provides typed access to the REST API behind the admin console:
//! - **Records** per collection (`/api/disputes`, `/api/incidents`, ...)
//! - **System health** (`/api/system/health`)
//! - **Profile settings** (`/api/settings/profile`)
//!
//! ## Envelope
//!
//! Every response is `{ success, data?, error? }`; see [`envelope`].
//! Failures surface as [`ApiError`], whose `code()` follows the backend's
//! taxonomy (`VALIDATION_ERROR`, `UNAUTHORIZED`, `NETWORK_ERROR`, ...).
//!
//! ## Seams
//!
//! The console depends on the [`RecordApi`] and [`SettingsApi`] traits, not
//! on this crate's HTTP clients, so the authenticated client is injected
//! rather than read from ambient storage.

pub mod config;
pub mod envelope;
pub mod error;
pub mod health;
pub mod records;
pub(crate) mod retry;
pub mod settings;
pub(crate) mod transport;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use health::HealthClient;
pub use records::{RecordApi, RecordClient};
pub use settings::{ProfileSettings, SettingsApi, SettingsClient};

use std::time::Duration;

use vox_records::Record;

use transport::Transport;

/// Top-level backend client. Hands out typed sub-clients sharing one
/// connection pool and bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Transport,
}

impl ApiClient {
    /// Create a new client from configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut value =
                    reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_token.as_str()))
                        .map_err(|_| ApiError::Config(ConfigError::MissingToken))?;
                value.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, value);
                headers
            })
            .build()
            .map_err(|e| ApiError::Network {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            transport: Transport::new(http, config.base_url.clone(), config.max_retries),
        })
    }

    /// Client for the collection of `R`.
    pub fn records<R: Record>(&self) -> RecordClient<R> {
        RecordClient::new(self.transport.clone())
    }

    /// Access the system-health client.
    pub fn health(&self) -> HealthClient {
        HealthClient::new(self.transport.clone())
    }

    /// Access the profile-settings client.
    pub fn settings(&self) -> SettingsClient {
        SettingsClient::new(self.transport.clone())
    }
}
