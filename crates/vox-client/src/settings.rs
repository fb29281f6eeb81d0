//! Typed client for the admin's own profile settings.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/settings/profile` | Current profile |
//! | PUT    | `/api/settings/profile` | Save profile; `VALIDATION_ERROR` carries per-field details |

use std::future::Future;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vox_core::FieldSource;

use crate::envelope::{decode, decode_required};
use crate::error::ApiError;
use crate::transport::Transport;

/// The editable profile. Field names in error maps use the wire (camelCase)
/// names, e.g. `fullName`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub timezone: String,
}

impl ProfileSettings {
    /// Wire names of every editable field.
    pub const FIELDS: &'static [&'static str] = &["fullName", "email", "phone", "company", "timezone"];

    /// Mutable access by wire name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "fullName" => Some(&mut self.full_name),
            "email" => Some(&mut self.email),
            "phone" => Some(&mut self.phone),
            "company" => Some(&mut self.company),
            "timezone" => Some(&mut self.timezone),
            _ => None,
        }
    }
}

impl FieldSource for ProfileSettings {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "fullName" => Some(&self.full_name),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "company" => Some(&self.company),
            "timezone" => Some(&self.timezone),
            _ => None,
        }
    }
}

/// Backend operations behind the settings form.
pub trait SettingsApi: Send + Sync {
    fn fetch_profile(&self) -> impl Future<Output = Result<ProfileSettings, ApiError>> + Send;

    /// Save `profile`, returning what the backend stored.
    fn update_profile(
        &self,
        profile: &ProfileSettings,
    ) -> impl Future<Output = Result<ProfileSettings, ApiError>> + Send;
}

/// HTTP client for profile settings.
#[derive(Debug, Clone)]
pub struct SettingsClient {
    transport: Transport,
}

impl SettingsClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

impl SettingsApi for SettingsClient {
    async fn fetch_profile(&self) -> Result<ProfileSettings, ApiError> {
        let endpoint = "GET /api/settings/profile";
        let url = self.transport.url(&["settings", "profile"])?;
        let (status, body) = self
            .transport
            .execute(endpoint, Method::GET, &url, |req| req)
            .await?;
        decode_required(endpoint, status, &body)
    }

    async fn update_profile(&self, profile: &ProfileSettings) -> Result<ProfileSettings, ApiError> {
        let endpoint = "PUT /api/settings/profile";
        let url = self.transport.url(&["settings", "profile"])?;
        let (status, body) = self
            .transport
            .execute(endpoint, Method::PUT, &url, |req| req.json(profile))
            .await?;
        // Some deployments answer `{ "success": true }` without echoing.
        Ok(decode(endpoint, status, &body)?.unwrap_or_else(|| profile.clone()))
    }
}
