//! Backend client error types.
//!
//! Every failure carries a wire `code()` from the backend's error taxonomy
//! and a coarse [`ErrorKind`] that decides how the console reacts.

use vox_core::FieldErrors;

/// `code()` of transport failures.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// `code()` of field-level validation failures.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// `code()` of authentication failures.
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";

/// How the console should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backend could not be reached.
    Network,
    /// The backend rejected field values; details are per field.
    Validation,
    /// The session is missing or expired.
    Authorization,
    /// Anything else.
    Unknown,
}

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport error (connection refused, timeout, reset).
    #[error("network error calling {endpoint}: {source}")]
    Network {
        endpoint: String,
        source: reqwest::Error,
    },
    /// `VALIDATION_ERROR` with per-field messages.
    #[error("validation failed for {endpoint}: {message}")]
    Validation {
        endpoint: String,
        message: String,
        details: FieldErrors,
    },
    /// HTTP 401 or an `UNAUTHORIZED` error code.
    #[error("unauthorized calling {endpoint}: {message}")]
    Unauthorized { endpoint: String, message: String },
    /// Any other error the backend reported.
    #[error("{endpoint} failed with {code} (HTTP {status}): {message}")]
    Rejected {
        endpoint: String,
        status: u16,
        code: String,
        message: String,
    },
    /// Response body was not a valid envelope for the expected type.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ApiError {
    /// Wire error code.
    pub fn code(&self) -> &str {
        match self {
            Self::Network { .. } => NETWORK_ERROR,
            Self::Validation { .. } => VALIDATION_ERROR,
            Self::Unauthorized { .. } => UNAUTHORIZED,
            Self::Rejected { code, .. } => code,
            Self::Deserialization { .. } => "INVALID_RESPONSE",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Coarse classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::Rejected { .. } | Self::Deserialization { .. } | Self::Config(_) => {
                ErrorKind::Unknown
            }
        }
    }

    /// Per-field messages of a validation error.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Human-readable message without the endpoint prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Network { .. } => "Unable to reach the server. Check your connection.".to_string(),
            Self::Validation { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Rejected { message, .. } => message.clone(),
            Self::Deserialization { .. } => "The server sent an unexpected response.".to_string(),
            Self::Config(e) => e.to_string(),
        }
    }
}
