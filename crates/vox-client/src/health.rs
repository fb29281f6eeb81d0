//! Typed client for the system-health endpoint (`GET /api/system/health`).

use reqwest::Method;
use vox_records::SystemHealth;

use crate::envelope::decode_required;
use crate::error::ApiError;
use crate::transport::Transport;

/// Client for platform service health.
#[derive(Debug, Clone)]
pub struct HealthClient {
    transport: Transport,
}

impl HealthClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Current status of every platform service.
    pub async fn check(&self) -> Result<SystemHealth, ApiError> {
        let endpoint = "GET /api/system/health";
        let url = self.transport.url(&["system", "health"])?;
        let (status, body) = self
            .transport
            .execute(endpoint, Method::GET, &url, |req| req)
            .await?;
        let health: SystemHealth = decode_required(endpoint, status, &body)?;
        tracing::debug!(overall = %health.overall(), services = health.services.len(), "health checked");
        Ok(health)
    }
}
